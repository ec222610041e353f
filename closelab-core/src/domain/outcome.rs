//! The result of one simulator run.

use serde::{Deserialize, Serialize};

/// Aggregate result of a single simulation.
///
/// `return_percentage` is `100 * total_profit / first_entry_price` when a
/// nonzero entry baseline exists, and `0.0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub total_profit: f64,
    pub return_percentage: f64,
    pub first_entry_price: Option<f64>,
    /// Number of closed round trips (long or short).
    pub trade_count: usize,
}

impl TradeOutcome {
    /// Outcome of a run that never traded.
    pub fn zero() -> Self {
        Self {
            total_profit: 0.0,
            return_percentage: 0.0,
            first_entry_price: None,
            trade_count: 0,
        }
    }

    pub fn from_totals(
        total_profit: f64,
        first_entry_price: Option<f64>,
        trade_count: usize,
    ) -> Self {
        Self {
            total_profit,
            return_percentage: return_percentage(total_profit, first_entry_price),
            first_entry_price,
            trade_count,
        }
    }

    pub fn has_traded(&self) -> bool {
        self.first_entry_price.is_some()
    }
}

impl Default for TradeOutcome {
    fn default() -> Self {
        Self::zero()
    }
}

/// Percentage return against the first entry price; 0 for a missing or zero baseline.
pub fn return_percentage(total_profit: f64, first_entry_price: Option<f64>) -> f64 {
    match first_entry_price {
        Some(base) if base != 0.0 => 100.0 * total_profit / base,
        _ => 0.0,
    }
}
