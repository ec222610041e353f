//! Per-run strategy parameters.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Parameters for a single simulator run.
///
/// `percent_diff` is in percentage points: `5.0` means a ±5% band around the
/// moving average. `allow_short` is only honoured by variants that report
/// short-selling support; the others reject it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyParameters {
    pub window_days: usize,
    pub percent_diff: f64,
    #[serde(default)]
    pub allow_short: bool,
}

impl StrategyParameters {
    pub fn new(window_days: usize, percent_diff: f64) -> Self {
        Self {
            window_days,
            percent_diff,
            allow_short: false,
        }
    }

    pub fn with_short_selling(mut self, allow_short: bool) -> Self {
        self.allow_short = allow_short;
        self
    }

    /// Band half-width as a fraction (`percent_diff / 100`).
    pub fn diff_fraction(&self) -> f64 {
        self.percent_diff * 0.01
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.window_days == 0 {
            return Err(SimError::invalid("window_days must be > 0"));
        }
        Ok(())
    }
}

impl Default for StrategyParameters {
    fn default() -> Self {
        Self::new(5, 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_fraction_is_percent_over_100() {
        assert_eq!(StrategyParameters::new(3, 5.0).diff_fraction(), 0.05);
        assert_eq!(StrategyParameters::new(3, -10.0).diff_fraction(), -0.1);
    }

    #[test]
    fn zero_window_is_invalid() {
        let err = StrategyParameters::new(0, 5.0).validate().unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn allow_short_defaults_to_false_when_missing() {
        let params: StrategyParameters =
            serde_json::from_str(r#"{"window_days":4,"percent_diff":2.5}"#).unwrap();
        assert!(!params.allow_short);
        assert_eq!(params.window_days, 4);
    }
}
