//! Price source trait and structured data errors.
//!
//! A `PriceSource` supplies closing prices for a symbol. An empty series is
//! a valid answer; the simulators turn it into a no-trade outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::PriceSeries;

/// Bar size requested from a price source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarGranularity {
    Minute,
    FiveMinutes,
    FifteenMinutes,
    #[default]
    Day,
}

impl BarGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "1Min",
            Self::FiveMinutes => "5Min",
            Self::FifteenMinutes => "15Min",
            Self::Day => "1D",
        }
    }
}

impl fmt::Display for BarGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarGranularity {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minute" | "1min" => Ok(Self::Minute),
            "5min" | "five_minutes" => Ok(Self::FiveMinutes),
            "15min" | "fifteen_minutes" => Ok(Self::FifteenMinutes),
            "day" | "1d" => Ok(Self::Day),
            other => Err(DataError::UnsupportedGranularity(other.to_string())),
        }
    }
}

/// Errors from price sources.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("authentication invalid: {0}")]
    AuthenticationInvalid(String),

    #[error("trading blocked for account")]
    TradingBlocked,

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("unsupported bar granularity: {0}")]
    UnsupportedGranularity(String),

    #[error("malformed price data in {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can hand out closing prices.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch up to `limit` most recent closes for `symbol` at `granularity`.
    fn fetch(
        &self,
        symbol: &str,
        limit: usize,
        granularity: BarGranularity,
    ) -> Result<PriceSeries, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_common_spellings() {
        assert_eq!("day".parse::<BarGranularity>().unwrap(), BarGranularity::Day);
        assert_eq!("1D".parse::<BarGranularity>().unwrap(), BarGranularity::Day);
        assert_eq!("5Min".parse::<BarGranularity>().unwrap(), BarGranularity::FiveMinutes);
        assert!("week".parse::<BarGranularity>().is_err());
    }

    #[test]
    fn granularity_defaults_to_day() {
        assert_eq!(BarGranularity::default(), BarGranularity::Day);
        assert_eq!(BarGranularity::Day.to_string(), "1D");
    }
}
