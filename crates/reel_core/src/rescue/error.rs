//! Overflow rescue error types.

use crate::models::RescueMode;

/// Errors that can occur during overflow rescue.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OverflowError {
    /// Even the strongest permitted mode cannot fit the target.
    ///
    /// `achieved` is the smallest total that mode could reach, so a caller
    /// can retry with a target of at least `achieved`.
    #[error(
        "Critical overflow: {mode} compression reached {achieved:.2}s, target is {target:.2}s (short by {shortfall:.2}s)"
    )]
    Critical {
        achieved: f64,
        target: f64,
        shortfall: f64,
        mode: RescueMode,
    },

    /// Target duration is negative or not a finite number.
    #[error("Invalid target duration: {0}")]
    InvalidTarget(f64),

    /// Compression policy tables are inconsistent.
    #[error("Invalid rescue config: {0}")]
    InvalidConfig(String),
}

impl OverflowError {
    /// Create a critical overflow error; shortfall is derived.
    pub fn critical(achieved: f64, target: f64, mode: RescueMode) -> Self {
        Self::Critical {
            achieved,
            target,
            shortfall: achieved - target,
            mode,
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Seconds still over budget, for critical overflows.
    pub fn shortfall(&self) -> Option<f64> {
        match self {
            Self::Critical { shortfall, .. } => Some(*shortfall),
            _ => None,
        }
    }
}
