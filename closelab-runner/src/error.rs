//! Sweep-layer errors.

use closelab_core::SimError;
use thiserror::Error;

/// Errors from grid construction, sweeping and ranking.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Empty ranges, zero windows, duplicate grid values, bad `top_k`.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Inconsistent internal state (e.g. partition results whose keys do
    /// not line up). Indicates a bug, never a user error.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("simulation failed: {0}")]
    Simulation(#[from] SimError),

    #[error("sweep cancelled after {completed} of {total} jobs")]
    Cancelled { completed: usize, total: usize },
}

impl SweepError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_) | Self::Simulation(SimError::InvalidParameter(_))
        )
    }
}
