//! Event sinks: where simulators report fills.
//!
//! Simulators never print. They hand every fill to an `EventSink`; the
//! default sink drops them, `TracingSink` forwards them to `tracing`, and a
//! `Vec<TradeEvent>` collects them for inspection.

use crate::domain::TradeEvent;

/// Receiver for structured trade events.
pub trait EventSink {
    fn record(&mut self, event: &TradeEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&mut self, _event: &TradeEvent) {}
}

impl EventSink for Vec<TradeEvent> {
    fn record(&mut self, event: &TradeEvent) {
        self.push(*event);
    }
}

/// Logs each event at `debug` level under a label (usually symbol + strategy).
#[derive(Debug, Clone)]
pub struct TracingSink {
    label: String,
}

impl TracingSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EventSink for TracingSink {
    fn record(&mut self, event: &TradeEvent) {
        tracing::debug!(
            target: "closelab::trades",
            label = %self.label,
            day = event.day_index,
            price = event.price,
            action = event.action.label(),
            profit = ?event.action.realized_profit(),
            "{event}"
        );
    }
}
