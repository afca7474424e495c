//! Configuration management for Reel Core.
//!
//! This module provides:
//! - TOML-based configuration with one section per component
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load, so inconsistent rescue tables never reach a run
//!
//! # Example
//!
//! ```no_run
//! use reel_core::align::{AlignConfig, TrackAligner};
//! use reel_core::config::{ConfigManager, ConfigSection};
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new(".config/reel.toml");
//! config.load_or_create().unwrap();
//!
//! // Build an aligner from the alignment section
//! let aligner = TrackAligner::new(AlignConfig::from(&config.settings().alignment));
//!
//! // Modify a setting
//! config.settings_mut().alignment.max_shift_ms = 2000;
//!
//! // Save just the alignment section atomically
//! config.update_section(ConfigSection::Alignment).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{AlignmentSettings, ConfigSection, LoggingSettings, RescueSettings, Settings};
