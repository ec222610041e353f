//! Order intents and the order-sink boundary.
//!
//! The simulators never place orders. These types describe what a live
//! wrapper would send to a broker; `PaperOrderSink` validates and records
//! intents without contacting anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{TradeAction, TradeEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderKind {
    Market,
    Limit { limit_price: f64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInForce {
    #[default]
    Day,
    GoodTillCancelled,
    ImmediateOrCancel,
}

/// A request to trade, as a live wrapper would submit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub symbol: String,
    pub shares: u32,
    pub side: OrderSide,
    pub kind: OrderKind,
    pub time_in_force: TimeInForce,
}

impl TradeIntent {
    pub fn market(symbol: impl Into<String>, shares: u32, side: OrderSide) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
            side,
            kind: OrderKind::Market,
            time_in_force: TimeInForce::Day,
        }
    }

    /// Limit order at the event's fill price, on the event's side.
    pub fn from_event(symbol: impl Into<String>, shares: u32, event: &TradeEvent) -> Self {
        let side = match event.action {
            TradeAction::OpenLong | TradeAction::CloseShort { .. } => OrderSide::Buy,
            TradeAction::CloseLong { .. } | TradeAction::OpenShort => OrderSide::Sell,
        };
        Self {
            symbol: symbol.into(),
            shares,
            side,
            kind: OrderKind::Limit {
                limit_price: event.price,
            },
            time_in_force: TimeInForce::Day,
        }
    }
}

/// Broker acknowledgement for an accepted intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("broker unavailable: {0}")]
    Unavailable(String),
}

/// Anything that accepts trade intents.
pub trait OrderSink {
    fn submit(&mut self, intent: &TradeIntent) -> Result<OrderAck, OrderError>;
}

/// Records intents in memory after basic validation.
#[derive(Debug, Default)]
pub struct PaperOrderSink {
    submitted: Vec<TradeIntent>,
}

impl PaperOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> &[TradeIntent] {
        &self.submitted
    }
}

impl OrderSink for PaperOrderSink {
    fn submit(&mut self, intent: &TradeIntent) -> Result<OrderAck, OrderError> {
        if intent.symbol.trim().is_empty() {
            return Err(OrderError::Rejected("empty symbol".into()));
        }
        if intent.shares == 0 {
            return Err(OrderError::Rejected("share count must be > 0".into()));
        }
        if let OrderKind::Limit { limit_price } = intent.kind {
            if !(limit_price.is_finite() && limit_price > 0.0) {
                return Err(OrderError::Rejected(format!(
                    "invalid limit price {limit_price}"
                )));
            }
        }
        self.submitted.push(intent.clone());
        Ok(OrderAck {
            order_id: format!("paper-{}", self.submitted.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_side_follows_event() {
        let buy = TradeEvent {
            day_index: 9,
            price: 20.5,
            action: TradeAction::OpenLong,
        };
        let intent = TradeIntent::from_event("AAPL", 3, &buy);
        assert_eq!(intent.side, OrderSide::Buy);
        assert_eq!(intent.kind, OrderKind::Limit { limit_price: 20.5 });

        let short = TradeEvent {
            day_index: 9,
            price: 20.5,
            action: TradeAction::OpenShort,
        };
        assert_eq!(TradeIntent::from_event("AAPL", 3, &short).side, OrderSide::Sell);
    }

    #[test]
    fn paper_sink_records_valid_intents() {
        let mut sink = PaperOrderSink::new();
        let ack = sink
            .submit(&TradeIntent::market("SPY", 10, OrderSide::Buy))
            .unwrap();
        assert_eq!(ack.order_id, "paper-1");
        assert_eq!(sink.submitted().len(), 1);
    }

    #[test]
    fn paper_sink_rejects_bad_intents() {
        let mut sink = PaperOrderSink::new();
        assert!(sink
            .submit(&TradeIntent::market("SPY", 0, OrderSide::Buy))
            .is_err());
        assert!(sink
            .submit(&TradeIntent::market(" ", 1, OrderSide::Sell))
            .is_err());

        let mut bad_limit = TradeIntent::market("SPY", 1, OrderSide::Buy);
        bad_limit.kind = OrderKind::Limit { limit_price: 0.0 };
        assert!(sink.submit(&bad_limit).is_err());
        assert!(sink.submitted().is_empty());
    }
}
