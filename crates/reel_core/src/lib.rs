//! Reel Core - timeline fitting logic for short-drama remixing
//!
//! This crate contains the duration planning core with zero UI dependencies:
//! - [`rescue`] fits an over-long scene list into a runtime budget
//! - [`align`] synchronizes video, audio, subtitle and effects tracks
//! - [`timing`] holds the shared time conversions
//!
//! Both components only compute a plan. Rendering it (cutting, padding,
//! resampling media) belongs to the export stage.

pub mod align;
pub mod config;
pub mod logging;
pub mod models;
pub mod rescue;
pub mod timing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
