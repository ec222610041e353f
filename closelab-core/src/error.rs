//! Error types for the simulation engine.
//!
//! Short price series and missing entry baselines are *not* errors: they
//! produce a zero `TradeOutcome`. Only malformed parameters and internal
//! inconsistencies surface here.

use thiserror::Error;

/// Errors raised by the simulators and the sampling utilities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A caller-supplied parameter is outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Internal arithmetic or bookkeeping went wrong. Indicates a bug.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SimError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}
