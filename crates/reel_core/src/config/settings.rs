//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::RescueMode;
use crate::rescue::ModeProfile;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Track alignment settings.
    #[serde(default)]
    pub alignment: AlignmentSettings,

    /// Overflow rescue settings.
    #[serde(default)]
    pub rescue: RescueSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Track alignment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSettings {
    /// Gaps below this many seconds count as aligned.
    #[serde(default = "default_alignment_threshold")]
    pub alignment_threshold: f64,

    /// Safe stretch band for video-like tracks is `[1/x, x]`.
    #[serde(default = "default_max_stretch_ratio")]
    pub max_stretch_ratio: f64,

    /// Largest audio excess removed by shifting instead of resampling.
    #[serde(default = "default_max_shift_ms")]
    pub max_shift_ms: u32,

    /// Prefer shifting audio over resampling it.
    #[serde(default = "default_true")]
    pub prefer_audio_intact: bool,

    /// Bounded shift for audio/video pairing, in milliseconds.
    #[serde(default = "default_sync_interval_ms")]
    pub sync_interval_ms: u32,
}

fn default_true() -> bool {
    true
}

fn default_alignment_threshold() -> f64 {
    1.0
}

fn default_max_stretch_ratio() -> f64 {
    1.2
}

fn default_max_shift_ms() -> u32 {
    5000
}

fn default_sync_interval_ms() -> u32 {
    50
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            alignment_threshold: default_alignment_threshold(),
            max_stretch_ratio: default_max_stretch_ratio(),
            max_shift_ms: default_max_shift_ms(),
            prefer_audio_intact: true,
            sync_interval_ms: default_sync_interval_ms(),
        }
    }
}

/// Overflow rescue configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescueSettings {
    /// Compression mode; `auto` escalates.
    #[serde(default)]
    pub mode: RescueMode,

    /// Pick the starting mode from the overflow size.
    #[serde(default = "default_true")]
    pub auto_mode_select: bool,

    /// Allowed overrun as a fraction of the target.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Floor for any scene's rescued length, in seconds.
    #[serde(default = "default_min_scene_duration")]
    pub min_scene_duration: f64,

    /// Scene tags that mark a scene as critical.
    #[serde(default = "default_protected_tags")]
    pub protected_tags: Vec<String>,

    /// Lowest score classed as critical.
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,

    /// Lowest score classed as high.
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,

    /// Lowest score classed as medium.
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: f64,

    /// Soft mode policy table.
    #[serde(default = "ModeProfile::soft")]
    pub soft: ModeProfile,

    /// Moderate mode policy table.
    #[serde(default = "ModeProfile::moderate")]
    pub moderate: ModeProfile,

    /// Aggressive mode policy table.
    #[serde(default = "ModeProfile::aggressive")]
    pub aggressive: ModeProfile,
}

fn default_tolerance() -> f64 {
    0.01
}

fn default_min_scene_duration() -> f64 {
    1.0
}

fn default_protected_tags() -> Vec<String> {
    vec!["critical".to_string()]
}

fn default_critical_threshold() -> f64 {
    0.85
}

fn default_high_threshold() -> f64 {
    0.65
}

fn default_medium_threshold() -> f64 {
    0.4
}

impl Default for RescueSettings {
    fn default() -> Self {
        Self {
            mode: RescueMode::default(),
            auto_mode_select: true,
            tolerance: default_tolerance(),
            min_scene_duration: default_min_scene_duration(),
            protected_tags: default_protected_tags(),
            critical_threshold: default_critical_threshold(),
            high_threshold: default_high_threshold(),
            medium_threshold: default_medium_threshold(),
            soft: ModeProfile::soft(),
            moderate: ModeProfile::moderate(),
            aggressive: ModeProfile::aggressive(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is unset.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact log format.
    #[serde(default = "default_true")]
    pub compact: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Alignment,
    Rescue,
    Logging,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Alignment => "alignment",
            ConfigSection::Rescue => "rescue",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Alignment => "# Multi-track alignment",
            ConfigSection::Rescue => "# Overflow rescue (scene compression)",
            ConfigSection::Logging => "# Logging configuration",
        }
    }

    /// All sections in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[Self::Alignment, Self::Rescue, Self::Logging]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[alignment]"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("max_shift_ms"));
        assert!(toml.contains("mode = \"auto\""));
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[alignment]\nmax_shift_ms = 200\n\n[rescue]\nmode = \"soft\"\n";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        // Custom values preserved
        assert_eq!(parsed.alignment.max_shift_ms, 200);
        assert_eq!(parsed.rescue.mode, RescueMode::Soft);
        // Defaults applied for missing
        assert_eq!(parsed.alignment.alignment_threshold, 1.0);
        assert_eq!(parsed.rescue.moderate, ModeProfile::moderate());
        assert!(parsed.logging.compact);
    }

    #[test]
    fn profile_tables_are_editable() {
        let text = r#"
[rescue.soft]
stop_at_tolerance = false

[rescue.soft.min_ratio]
critical = 1.0
high = 0.9
medium = 0.8
low = 0.7

[rescue.soft.cut_weight]
critical = 0.0
high = 0.5
medium = 0.8
low = 1.0
"#;
        let parsed: Settings = toml::from_str(text).unwrap();
        assert_eq!(parsed.rescue.soft.min_ratio.low, 0.7);
        assert!(!parsed.rescue.soft.stop_at_tolerance);
        assert_eq!(parsed.rescue.aggressive, ModeProfile::aggressive());
    }
}
