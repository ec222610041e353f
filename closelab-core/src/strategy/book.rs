//! Position bookkeeping shared by the simulators.
//!
//! Holds at most one long and one short entry, accumulates realized profit,
//! and remembers the first buy-side fill as the return baseline.

use crate::domain::{TradeAction, TradeEvent, TradeOutcome};
use crate::sink::EventSink;

pub(crate) struct PositionBook<'a> {
    long_entry: Option<f64>,
    short_entry: Option<f64>,
    total_profit: f64,
    first_entry: Option<f64>,
    trade_count: usize,
    sink: &'a mut dyn EventSink,
}

impl<'a> PositionBook<'a> {
    pub(crate) fn new(sink: &'a mut dyn EventSink) -> Self {
        Self {
            long_entry: None,
            short_entry: None,
            total_profit: 0.0,
            first_entry: None,
            trade_count: 0,
            sink,
        }
    }

    pub(crate) fn has_long(&self) -> bool {
        self.long_entry.is_some()
    }

    pub(crate) fn has_short(&self) -> bool {
        self.short_entry.is_some()
    }

    pub(crate) fn open_long(&mut self, day_index: usize, price: f64) {
        debug_assert!(self.long_entry.is_none(), "long already open");
        self.long_entry = Some(price);
        self.mark_buy(price);
        self.emit(day_index, price, TradeAction::OpenLong);
    }

    pub(crate) fn close_long(&mut self, day_index: usize, price: f64) {
        if let Some(entry) = self.long_entry.take() {
            let profit = price - entry;
            self.realize(profit);
            self.emit(day_index, price, TradeAction::CloseLong { profit });
        }
    }

    pub(crate) fn open_short(&mut self, day_index: usize, price: f64) {
        debug_assert!(self.short_entry.is_none(), "short already open");
        self.short_entry = Some(price);
        self.emit(day_index, price, TradeAction::OpenShort);
    }

    pub(crate) fn close_short(&mut self, day_index: usize, price: f64) {
        if let Some(entry) = self.short_entry.take() {
            let profit = entry - price;
            self.realize(profit);
            self.mark_buy(price);
            self.emit(day_index, price, TradeAction::CloseShort { profit });
        }
    }

    /// Open positions are dropped; only realized profit counts.
    pub(crate) fn finish(self) -> TradeOutcome {
        TradeOutcome::from_totals(self.total_profit, self.first_entry, self.trade_count)
    }

    fn mark_buy(&mut self, price: f64) {
        if self.first_entry.is_none() {
            self.first_entry = Some(price);
        }
    }

    fn realize(&mut self, profit: f64) {
        self.total_profit += profit;
        self.trade_count += 1;
    }

    fn emit(&mut self, day_index: usize, price: f64, action: TradeAction) {
        self.sink.record(&TradeEvent {
            day_index,
            price,
            action,
        });
    }
}
