//! Logging setup for Reel Core.
//!
//! The library itself only emits `tracing` events:
//! - `info` for each alignment or rescue call
//! - `debug` for per-track plans and per-mode decisions
//! - `warn` for mode escalation and ambiguous input
//!
//! Applications install a subscriber once at startup with [`init_tracing`]
//! or [`init_from_settings`].
//!
//! # Example
//!
//! ```no_run
//! use reel_core::logging::{init_tracing, LogLevel};
//!
//! init_tracing(LogLevel::Debug);
//! ```

mod types;

pub use types::LogLevel;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_level))
        .init();
}

/// Initialize the global subscriber from the `[logging]` config section.
pub fn init_from_settings(settings: &LoggingSettings) {
    if settings.compact {
        tracing_subscriber::registry()
            .with(fmt::layer().compact().with_target(false))
            .with(env_filter(settings.level))
            .init();
    } else {
        init_tracing(settings.level);
    }
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_filter_works() {
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert_eq!(LogLevel::Info.as_filter_str(), "info");
    }

    #[test]
    fn test_tracing_can_be_installed_twice() {
        init_test_tracing();
        init_test_tracing();
        tracing::warn!("test subscriber active");
    }
}
