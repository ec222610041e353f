//! Simple moving average crossover.
//!
//! The average covers the `window_days` prices before the current day.
//! Price above the average opens a long, price below it closes the long.
//! Long-only; `percent_diff` is unused.

use super::book::PositionBook;
use super::{Simulator, StrategyKind};
use crate::domain::{StrategyParameters, TradeOutcome};
use crate::rolling::RollingWindow;
use crate::sink::EventSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMovingAverage;

impl Simulator for SimpleMovingAverage {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SimpleMovingAverage
    }

    fn execute(
        &self,
        prices: &[f64],
        params: &StrategyParameters,
        sink: &mut dyn EventSink,
    ) -> TradeOutcome {
        let mut window = RollingWindow::new(params.window_days);
        let mut book = PositionBook::new(sink);

        for (day, &price) in prices.iter().enumerate() {
            if let Some(average) = window.full_mean() {
                if price > average && !book.has_long() {
                    book.open_long(day, price);
                } else if price < average && book.has_long() {
                    book.close_long(day, price);
                }
            }
            window.push(price);
        }

        book.finish()
    }
}
