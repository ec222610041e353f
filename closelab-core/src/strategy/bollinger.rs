//! Bollinger-style percentage bands around a trailing average.
//!
//! The average covers the half-open slice `[i - window_days, i)`. With
//! `diff = percent_diff / 100`:
//! - price above `avg * (1 - diff)` with no long open: cover an open short,
//!   otherwise open a long;
//! - else price below `avg * (1 + diff)`: close an open long, otherwise open
//!   a short when short selling is allowed and none is open.
//!
//! The first buy-side fill (long open or short cover) is the return baseline.

use super::book::PositionBook;
use super::{Simulator, StrategyKind};
use crate::domain::{StrategyParameters, TradeOutcome};
use crate::rolling::RollingWindow;
use crate::sink::EventSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct BollingerBands;

impl Simulator for BollingerBands {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BollingerBands
    }

    fn supports_short_selling(&self) -> bool {
        true
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

        for (day, &price) in prices.iter().enumerate() {
            if let Some(average) = window.full_mean() {
                let lower = average * (1.0 - diff);
                let upper = average * (1.0 + diff);

                if price > lower && !book.has_long() {
                    if book.has_short() {
                        book.close_short(day, price);
                    } else {
                        book.open_long(day, price);
                    }
                } else if price < upper {
                    if book.has_long() {
                        book.close_long(day, price);
                    } else if params.allow_short && !book.has_short() {
                        book.open_short(day, price);
                    }
                }
            }
            window.push(price);
        }

        book.finish()
    }
}
