//! Overflow rescue: fit a scene list into a runtime budget.
//!
//! When the scenes selected for a cut run longer than the target, the
//! rescuer shortens them non-uniformly instead of dropping any:
//!
//! 1. **Evaluate**: compare the total with the target. Within budget is a no-op.
//! 2. **Select mode**: a pinned mode, or in `Auto` a starting mode suggested
//!    by how large the overflow is and how many scenes are critical.
//! 3. **Classify**: give each scene an [`ImportanceLevel`] from its score
//!    (protected tags force `Critical`).
//! 4. **Compress**: shrink scenes with the mode's per-level policy.
//! 5. **Verify**: accept the result, escalate to the next stronger mode
//!    (`Auto` only), or fail with [`OverflowError::Critical`].
//!
//! Every pass starts from the original durations, so escalation never
//! compounds earlier cuts. Each mode is capped per scene by the ratios the
//! weaker modes chose for the same list, so a stronger mode never keeps
//! more of any scene. A pinned or suggested mode still runs the weaker
//! modes first to obtain that cap.
//!
//! # Usage
//!
//! ```
//! use reel_core::models::{RescueMode, Scene};
//! use reel_core::rescue::{handle_overflow, sum_duration, OverflowError};
//!
//! let scenes = vec![
//!     Scene::with_duration("opening", 40.0, 0.7),
//!     Scene::with_duration("filler", 40.0, 0.2),
//!     Scene::with_duration("climax", 40.0, 0.9),
//! ];
//!
//! let fitted = match handle_overflow(&scenes, 100.0, RescueMode::Auto) {
//!     Ok(fitted) => fitted,
//!     // Retry with the smallest total that mode could reach
//!     Err(OverflowError::Critical { achieved, .. }) => {
//!         handle_overflow(&scenes, achieved, RescueMode::Auto).unwrap()
//!     }
//!     Err(e) => panic!("{e}"),
//! };
//! assert!(sum_duration(&fitted) <= 100.0 + 1e-6);
//! ```

mod classify;
mod compress;
mod error;
mod profile;

pub use compress::CompressionPlan;
pub use error::OverflowError;
pub use profile::{LevelFactors, LevelThresholds, ModeProfile, RescueConfig};

pub use crate::models::sum_duration;

use crate::models::{AdjustmentInfo, ImportanceLevel, RescueMode, Scene};
use crate::timing::{format_timecode, EPSILON};

/// Overflow share below which soft compression is suggested.
const SOFT_OVERFLOW_LIMIT: f64 = 0.05;
/// Overflow share below which moderate compression is suggested.
const MODERATE_OVERFLOW_LIMIT: f64 = 0.15;
/// Critical-scene share that lifts a soft suggestion to moderate.
const SOFT_CRITICAL_LIMIT: f64 = 0.5;
/// Critical-scene share that lifts a moderate suggestion to aggressive.
const MODERATE_CRITICAL_LIMIT: f64 = 0.7;

/// Fits scene lists into a target duration.
///
/// Stateless apart from its configuration; one rescuer can serve any
/// number of calls, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct OverflowRescuer {
    config: RescueConfig,
}

impl OverflowRescuer {
    /// Create a rescuer with an explicit configuration.
    pub fn new(config: RescueConfig) -> Self {
        Self { config }
    }

    /// Create a rescuer using the default tables and a pinned or auto mode.
    pub fn with_mode(mode: RescueMode) -> Self {
        Self::new(RescueConfig::with_mode(mode))
    }

    /// Get the active configuration.
    pub fn config(&self) -> &RescueConfig {
        &self.config
    }

    /// Shrink `scenes` so their total fits `target_duration`.
    ///
    /// Returns a new list in input order. Every scene carries
    /// `original_duration` and `importance_level`; when compression ran,
    /// each also carries its [`AdjustmentInfo`]. Scene `start`/`end` are
    /// left as the source positions.
    ///
    /// # Errors
    ///
    /// - [`OverflowError::InvalidTarget`] for a negative or non-finite target
    /// - [`OverflowError::InvalidConfig`] for inconsistent policy tables
    /// - [`OverflowError::Critical`] when the strongest permitted mode still
    ///   overshoots the target
    pub fn handle_overflow(
        &self,
        scenes: &[Scene],
        target_duration: f64,
    ) -> Result<Vec<Scene>, OverflowError> {
        if !target_duration.is_finite() || target_duration < 0.0 {
            return Err(OverflowError::InvalidTarget(target_duration));
        }
        self.config.validate()?;

        let mut adjusted = scenes.to_vec();
        classify::classify(&mut adjusted, &self.config);

        let current = sum_duration(&adjusted);
        if current <= target_duration {
            tracing::debug!(
                "Total {:.2}s already within target {:.2}s, no rescue needed",
                current,
                target_duration
            );
            return Ok(adjusted);
        }

        let overflow = current - target_duration;
        tracing::info!(
            "Overflow detected: total {:.2}s, target {:.2}s, over by {:.2}s ({:.1}%)",
            current,
            target_duration,
            overflow,
            100.0 * overflow / current
        );

        let start = self.starting_mode(&adjusted, overflow / current);
        let limit = target_duration + self.config.tolerance_secs(target_duration) + EPSILON;
        let ladder = RescueMode::ladder();
        let first = ladder.iter().position(|m| *m == start).unwrap_or(0);

        // Ratios of the previous mode cap the next, so escalating never
        // gives a scene back any of its length
        let mut ceiling: Option<Vec<f64>> = None;

        for (step, &mode) in ladder.iter().enumerate() {
            let plan = self.compress_in(mode, &adjusted, target_duration, ceiling.as_deref());
            if step < first {
                ceiling = Some(plan.ratios);
                continue;
            }

            if plan.reached && plan.total <= limit {
                tracing::info!(
                    "Rescue finished in {} mode: total {} (target {})",
                    mode,
                    format_timecode(plan.total),
                    format_timecode(target_duration)
                );
                apply_plan(&mut adjusted, &plan, mode);
                return Ok(adjusted);
            }

            let next = ladder
                .get(step + 1)
                .filter(|_| self.config.mode == RescueMode::Auto);
            match next {
                Some(next) => {
                    tracing::warn!(
                        "{} compression reached only {:.2}s of {:.2}s, escalating to {}",
                        mode,
                        plan.total,
                        target_duration,
                        next
                    );
                    ceiling = Some(plan.ratios);
                }
                None => {
                    let err = OverflowError::critical(plan.total, target_duration, mode);
                    tracing::warn!("{}", err);
                    return Err(err);
                }
            }
        }

        Err(OverflowError::critical(current, target_duration, start))
    }

    /// Compress under one concrete mode, capped by a weaker mode's ratios.
    fn compress_in(
        &self,
        mode: RescueMode,
        scenes: &[Scene],
        target_duration: f64,
        ceiling: Option<&[f64]>,
    ) -> CompressionPlan {
        let profile = self.config.profile(mode);
        let aim = if profile.stop_at_tolerance {
            target_duration + self.config.tolerance_secs(target_duration)
        } else {
            target_duration
        };
        compress::compress(scenes, profile, self.config.min_scene_duration, aim, ceiling)
    }

    /// First concrete mode to try for a classified scene list.
    fn starting_mode(&self, scenes: &[Scene], overflow_share: f64) -> RescueMode {
        if self.config.mode != RescueMode::Auto {
            return self.config.mode;
        }
        if !self.config.auto_mode_select {
            return RescueMode::Soft;
        }

        let critical = classify::critical_share(scenes);
        let mode = suggest_mode(overflow_share, critical);
        tracing::info!(
            "Suggested {} mode (overflow {:.1}%, critical scenes {:.1}%)",
            mode,
            100.0 * overflow_share,
            100.0 * critical
        );
        mode
    }
}

/// Suggest a starting mode from the overflow share and critical-scene share.
///
/// Both shares are fractions in `0..=1`. A high share of critical scenes
/// leaves less room to cut, so it lifts the suggestion by one step.
pub fn suggest_mode(overflow_share: f64, critical_share: f64) -> RescueMode {
    let by_overflow = if overflow_share < SOFT_OVERFLOW_LIMIT {
        RescueMode::Soft
    } else if overflow_share < MODERATE_OVERFLOW_LIMIT {
        RescueMode::Moderate
    } else {
        RescueMode::Aggressive
    };

    match by_overflow {
        RescueMode::Soft if critical_share > SOFT_CRITICAL_LIMIT => RescueMode::Moderate,
        RescueMode::Moderate if critical_share > MODERATE_CRITICAL_LIMIT => RescueMode::Aggressive,
        mode => mode,
    }
}

/// Rescue with default policy tables.
///
/// `RescueMode::Auto` escalates through the modes; any other mode is pinned.
pub fn handle_overflow(
    scenes: &[Scene],
    target_duration: f64,
    mode: RescueMode,
) -> Result<Vec<Scene>, OverflowError> {
    OverflowRescuer::with_mode(mode).handle_overflow(scenes, target_duration)
}

fn apply_plan(scenes: &mut [Scene], plan: &CompressionPlan, mode: RescueMode) {
    for (scene, &duration) in scenes.iter_mut().zip(&plan.durations) {
        let original = scene.original_duration.unwrap_or(scene.duration);
        scene.duration = duration;
        scene.adjustment = Some(AdjustmentInfo {
            original_duration: original,
            adjusted_duration: duration,
            compression_ratio: if original > 0.0 { duration / original } else { 1.0 },
            mode,
        });
        if scene.importance_level == Some(ImportanceLevel::Critical) && duration < original {
            tracing::debug!(
                "Critical scene '{}' shortened {:.2}s -> {:.2}s",
                scene.id,
                original,
                duration
            );
        }
    }
}
