//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Type of media track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
    Effects,
    #[default]
    Other,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Subtitle => write!(f, "subtitle"),
            TrackKind::Effects => write!(f, "effects"),
            TrackKind::Other => write!(f, "other"),
        }
    }
}

/// Which alignment branch produced a track's final timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMethod {
    /// Gap was below the alignment threshold; content untouched.
    WithinThreshold,
    /// All time references scaled by a ratio.
    Stretch,
    /// Content translated by a constant offset.
    Shift,
    /// Tail dropped to reach the target.
    Crop,
    /// Leading blank time inserted to reach the target.
    Pad,
    /// Subtitle cues scaled onto the target timeline.
    Rescale,
}

impl AlignMethod {
    /// Get the display name for this method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WithinThreshold => "within-threshold",
            Self::Stretch => "stretch",
            Self::Shift => "shift",
            Self::Crop => "crop",
            Self::Pad => "pad",
            Self::Rescale => "rescale",
        }
    }
}

impl std::fmt::Display for AlignMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Coarse importance tier derived from a scene's importance score.
///
/// Ordered from least to most important, so `Low < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ImportanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportanceLevel::Low => write!(f, "low"),
            ImportanceLevel::Medium => write!(f, "medium"),
            ImportanceLevel::High => write!(f, "high"),
            ImportanceLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Compression mode for overflow rescue.
///
/// `Auto` starts from a suggested mode and escalates on failure; the other
/// variants pin a single mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RescueMode {
    #[default]
    Auto,
    Soft,
    Moderate,
    Aggressive,
}

impl RescueMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Soft => "soft",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }

    /// Concrete compression modes, weakest first.
    pub fn ladder() -> &'static [RescueMode] {
        &[Self::Soft, Self::Moderate, Self::Aggressive]
    }
}

impl std::fmt::Display for RescueMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TrackKind::Effects).unwrap();
        assert_eq!(json, "\"effects\"");
    }

    #[test]
    fn track_kind_deserializes_lowercase() {
        let kind: TrackKind = serde_json::from_str("\"subtitle\"").unwrap();
        assert_eq!(kind, TrackKind::Subtitle);
    }

    #[test]
    fn importance_levels_are_ordered() {
        assert!(ImportanceLevel::Critical > ImportanceLevel::High);
        assert!(ImportanceLevel::Medium > ImportanceLevel::Low);
        let mut levels = vec![
            ImportanceLevel::Critical,
            ImportanceLevel::Low,
            ImportanceLevel::High,
            ImportanceLevel::Medium,
        ];
        levels.sort();
        assert_eq!(levels[0], ImportanceLevel::Low);
        assert_eq!(levels[3], ImportanceLevel::Critical);
    }

    #[test]
    fn rescue_mode_escalation_ladder() {
        assert_eq!(
            RescueMode::ladder(),
            &[RescueMode::Soft, RescueMode::Moderate, RescueMode::Aggressive]
        );
        assert!(!RescueMode::ladder().contains(&RescueMode::Auto));
    }

    #[test]
    fn align_method_serializes_snake_case() {
        let json = serde_json::to_string(&AlignMethod::WithinThreshold).unwrap();
        assert_eq!(json, "\"within_threshold\"");
    }
}
