//! Mean reversion: buy well below the trailing average, sell well above it.
//!
//! Prices are rounded to cents before use so that values sitting on a band
//! edge do not flap. The average comes from the window *before* today's
//! price is appended, and the strategy only acts once the window holds
//! exactly `window_days` prices. Long-only.

use super::book::PositionBook;
use super::{round_cents, Simulator, StrategyKind};
use crate::domain::{StrategyParameters, TradeOutcome};
use crate::rolling::RollingWindow;
use crate::sink::EventSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanReversion;

impl Simulator for MeanReversion {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MeanReversion
    }

    fn execute(
        &self,
        prices: &[f64],
        params: &StrategyParameters,
        sink: &mut dyn EventSink,
    ) -> TradeOutcome {
        let diff = params.diff_fraction();
        let mut window = RollingWindow::new(params.window_days);
        let mut book = PositionBook::new(sink);

        for (day, &raw) in prices.iter().enumerate() {
            let price = round_cents(raw);

            if let Some(average) = window.full_mean() {
                if price > average * (1.0 + diff) && book.has_long() {
                    book.close_long(day, price);
                } else if price < average * (1.0 - diff) && !book.has_long() {
                    book.open_long(day, price);
                }
            }
            window.push(price);
        }

        book.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeEvent;

    fn run(prices: &[f64], window: usize, diff: f64) -> (TradeOutcome, Vec<TradeEvent>) {
        let mut events = Vec::new();
        let outcome = MeanReversion
            .simulate_with(prices, &StrategyParameters::new(window, diff), &mut events)
            .unwrap();
        (outcome, events)
    }

    #[test]
    fn buys_dip_and_sells_spike() {
        let prices = [10.0, 11.0, 9.0, 8.0, 12.0, 15.0, 14.0, 9.0, 8.0, 20.0];
        let (outcome, events) = run(&prices, 3, 5.0);

        let labels: Vec<(usize, &str)> = events
            .iter()
            .map(|e| (e.day_index, e.action.label()))
            .collect();
        assert_eq!(labels, vec![(3, "buy"), (4, "sell"), (7, "buy"), (9, "sell")]);
        assert_eq!(outcome.total_profit, 15.0);
        assert_eq!(outcome.first_entry_price, Some(8.0));
        assert_eq!(outcome.return_percentage, 187.5);
        assert_eq!(outcome.trade_count, 2);
    }

    #[test]
    fn rounding_keeps_price_on_band_edge() {
        // 9.496 rounds to 9.50, exactly the lower band of 10 * 0.95.
        let (outcome, events) = run(&[10.004, 10.004, 9.496], 2, 5.0);
        assert!(events.is_empty());
        assert_eq!(outcome, TradeOutcome::zero());
    }

    #[test]
    fn fills_use_rounded_prices() {
        let (_, events) = run(&[10.0, 10.0, 8.123], 2, 5.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].price, 8.12);
    }

    #[test]
    fn needs_full_window_before_acting() {
        // The dip on day 1 would trigger with a 1-day window, not with 3.
        let (_, events) = run(&[10.0, 5.0, 10.0], 3, 5.0);
        assert!(events.is_empty());

        let (_, events) = run(&[10.0, 5.0, 10.0], 1, 5.0);
        let labels: Vec<(usize, &str)> = events
            .iter()
            .map(|e| (e.day_index, e.action.label()))
            .collect();
        assert_eq!(labels, vec![(1, "buy"), (2, "sell")]);
    }

    #[test]
    fn flat_prices_never_cross_band() {
        let (outcome, events) = run(&[100.0; 10], 3, 5.0);
        assert!(events.is_empty());
        assert_eq!(outcome.total_profit, 0.0);
    }
}
