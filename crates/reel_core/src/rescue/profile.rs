//! Rescue policy tables and configuration.
//!
//! The numbers here are tunable policy, not physics. What must hold is
//! monotonicity:
//! - within a mode, a more important level keeps at least as large a
//!   fraction (`min_ratio` rises, `cut_weight` falls with importance)
//! - a stronger mode may cut every level at least as deep as a weaker one
//!
//! [`RescueConfig::validate`] enforces both on the tables. Per scene, the
//! solver additionally caps each mode by the weaker mode's ratios.

use serde::{Deserialize, Serialize};

use super::error::OverflowError;
use crate::config::RescueSettings;
use crate::models::{ImportanceLevel, RescueMode};

/// One value per importance level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelFactors {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl LevelFactors {
    /// Create factors, most important level first.
    pub const fn new(critical: f64, high: f64, medium: f64, low: f64) -> Self {
        Self {
            critical,
            high,
            medium,
            low,
        }
    }

    /// Value for a level.
    pub fn get(&self, level: ImportanceLevel) -> f64 {
        match level {
            ImportanceLevel::Critical => self.critical,
            ImportanceLevel::High => self.high,
            ImportanceLevel::Medium => self.medium,
            ImportanceLevel::Low => self.low,
        }
    }

    /// Values ordered least important first.
    fn ascending(&self) -> [f64; 4] {
        [self.low, self.medium, self.high, self.critical]
    }
}

/// Compression policy of one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeProfile {
    /// Smallest fraction of its original duration a scene may keep.
    pub min_ratio: LevelFactors,
    /// Relative share of the required cut taken by each level.
    pub cut_weight: LevelFactors,
    /// Only cut down to the upper edge of the tolerance band.
    #[serde(default)]
    pub stop_at_tolerance: bool,
}

impl ModeProfile {
    /// Default soft profile: critical scenes untouched, light cuts elsewhere.
    pub fn soft() -> Self {
        Self {
            min_ratio: LevelFactors::new(1.0, 0.85, 0.7, 0.6),
            cut_weight: LevelFactors::new(0.0, 0.4, 0.8, 1.0),
            stop_at_tolerance: true,
        }
    }

    /// Default moderate profile: most of the cut lands on medium/low scenes.
    pub fn moderate() -> Self {
        Self {
            min_ratio: LevelFactors::new(0.9, 0.75, 0.6, 0.5),
            cut_weight: LevelFactors::new(0.15, 0.4, 0.75, 1.0),
            stop_at_tolerance: false,
        }
    }

    /// Default aggressive profile: every level may lose a large share.
    pub fn aggressive() -> Self {
        Self {
            min_ratio: LevelFactors::new(0.8, 0.6, 0.45, 0.35),
            cut_weight: LevelFactors::new(0.2, 0.45, 0.75, 1.0),
            stop_at_tolerance: false,
        }
    }

    fn validate(&self, name: &str) -> Result<(), OverflowError> {
        let ratios = self.min_ratio.ascending();
        let weights = self.cut_weight.ascending();

        if ratios.iter().any(|r| !(0.0..=1.0).contains(r)) {
            return Err(OverflowError::invalid_config(format!(
                "{name}: min_ratio values must be within 0..=1"
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(OverflowError::invalid_config(format!(
                "{name}: cut_weight values must be finite and non-negative"
            )));
        }
        if ratios.windows(2).any(|w| w[0] > w[1]) {
            return Err(OverflowError::invalid_config(format!(
                "{name}: min_ratio must not decrease with importance"
            )));
        }
        if weights.windows(2).any(|w| w[0] < w[1]) {
            return Err(OverflowError::invalid_config(format!(
                "{name}: cut_weight must not increase with importance"
            )));
        }
        Ok(())
    }
}

/// Score cut-offs for the importance levels (inclusive lower bounds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelThresholds {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            critical: 0.85,
            high: 0.65,
            medium: 0.4,
        }
    }
}

impl LevelThresholds {
    /// Level for a raw importance score. NaN scores are `Low`.
    pub fn level_for(&self, score: f64) -> ImportanceLevel {
        if score >= self.critical {
            ImportanceLevel::Critical
        } else if score >= self.high {
            ImportanceLevel::High
        } else if score >= self.medium {
            ImportanceLevel::Medium
        } else {
            ImportanceLevel::Low
        }
    }
}

/// Configuration for [`OverflowRescuer`](super::OverflowRescuer).
#[derive(Debug, Clone, PartialEq)]
pub struct RescueConfig {
    /// Pinned mode, or `Auto` to escalate.
    pub mode: RescueMode,
    pub thresholds: LevelThresholds,
    /// Tags that force a scene to the critical level.
    pub protected_tags: Vec<String>,
    /// No scene is cut below `min(original, min_scene_duration)` seconds.
    pub min_scene_duration: f64,
    /// Fraction of the target a rescued total may overrun.
    pub tolerance: f64,
    /// In `Auto`, start from the mode suggested by the overflow size.
    pub auto_mode_select: bool,
    pub soft: ModeProfile,
    pub moderate: ModeProfile,
    pub aggressive: ModeProfile,
}

impl Default for RescueConfig {
    fn default() -> Self {
        Self {
            mode: RescueMode::Auto,
            thresholds: LevelThresholds::default(),
            protected_tags: vec!["critical".to_string()],
            min_scene_duration: 1.0,
            tolerance: 0.01,
            auto_mode_select: true,
            soft: ModeProfile::soft(),
            moderate: ModeProfile::moderate(),
            aggressive: ModeProfile::aggressive(),
        }
    }
}

impl From<&RescueSettings> for RescueConfig {
    fn from(settings: &RescueSettings) -> Self {
        Self {
            mode: settings.mode,
            thresholds: LevelThresholds {
                critical: settings.critical_threshold,
                high: settings.high_threshold,
                medium: settings.medium_threshold,
            },
            protected_tags: settings.protected_tags.clone(),
            min_scene_duration: settings.min_scene_duration,
            tolerance: settings.tolerance,
            auto_mode_select: settings.auto_mode_select,
            soft: settings.soft.clone(),
            moderate: settings.moderate.clone(),
            aggressive: settings.aggressive.clone(),
        }
    }
}

impl RescueConfig {
    /// Default config with a pinned mode.
    pub fn with_mode(mode: RescueMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Profile for a concrete mode. `Auto` maps to the soft profile.
    pub fn profile(&self, mode: RescueMode) -> &ModeProfile {
        match mode {
            RescueMode::Auto | RescueMode::Soft => &self.soft,
            RescueMode::Moderate => &self.moderate,
            RescueMode::Aggressive => &self.aggressive,
        }
    }

    /// Tolerance band in seconds for a given target.
    pub fn tolerance_secs(&self, target: f64) -> f64 {
        self.tolerance * target
    }

    /// Check thresholds and profile tables for consistency.
    pub fn validate(&self) -> Result<(), OverflowError> {
        let t = &self.thresholds;
        if !(t.medium <= t.high && t.high <= t.critical) {
            return Err(OverflowError::invalid_config(
                "thresholds must satisfy medium <= high <= critical",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(OverflowError::invalid_config(
                "tolerance must be finite and non-negative",
            ));
        }
        if !self.min_scene_duration.is_finite() || self.min_scene_duration < 0.0 {
            return Err(OverflowError::invalid_config(
                "min_scene_duration must be finite and non-negative",
            ));
        }

        for mode in RescueMode::ladder() {
            self.profile(*mode).validate(mode.name())?;
        }

        // A stronger mode may never keep more of a level than a weaker one
        for pair in RescueMode::ladder().windows(2) {
            let weaker = self.profile(pair[0]).min_ratio.ascending();
            let stronger = self.profile(pair[1]).min_ratio.ascending();
            if weaker.iter().zip(stronger.iter()).any(|(w, s)| s > w) {
                return Err(OverflowError::invalid_config(format!(
                    "{} min_ratio must not exceed {} min_ratio",
                    pair[1], pair[0]
                )));
            }
        }

        Ok(())
    }
}
