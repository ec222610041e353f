//! Structured trade events emitted while a simulator runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to the position on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeAction {
    OpenLong,
    CloseLong { profit: f64 },
    OpenShort,
    CloseShort { profit: f64 },
}

impl TradeAction {
    /// True for actions that buy shares (opening a long or covering a short).
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::OpenLong | Self::CloseShort { .. })
    }

    /// Realized profit, if this action closed a position.
    pub fn realized_profit(&self) -> Option<f64> {
        match self {
            Self::CloseLong { profit } | Self::CloseShort { profit } => Some(*profit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenLong => "buy",
            Self::CloseLong { .. } => "sell",
            Self::OpenShort => "short",
            Self::CloseShort { .. } => "cover",
        }
    }
}

/// One fill inside a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub day_index: usize,
    pub price: f64,
    pub action: TradeAction,
}

impl fmt::Display for TradeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {:>4} {:<5} at {:.2}",
            self.day_index,
            self.action.label(),
            self.price
        )?;
        if let Some(profit) = self.action.realized_profit() {
            write!(f, " (trade profit {profit:.2})")?;
        }
        Ok(())
    }
}
