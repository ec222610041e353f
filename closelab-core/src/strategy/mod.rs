//! Strategy simulators, one deterministic single-pass simulator per variant.
//!
//! Each simulator consumes a price slice and `StrategyParameters` and returns
//! a `TradeOutcome`. Fills are reported to an injected `EventSink`; nothing
//! is printed. Short selling is a per-variant capability: a simulator that
//! does not support it rejects `allow_short = true`.

mod book;
pub mod bollinger;
pub mod mean_reversion;
pub mod sma;

pub use bollinger::BollingerBands;
pub use mean_reversion::MeanReversion;
pub use sma::SimpleMovingAverage;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{StrategyParameters, TradeEvent, TradeOutcome};
use crate::error::SimError;
use crate::sink::{EventSink, NoopSink};

/// Trait implemented by every strategy variant.
pub trait Simulator: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Whether `allow_short = true` is meaningful for this variant.
    fn supports_short_selling(&self) -> bool {
        false
    }

    /// Run the strategy over `prices` without validating `params`.
    ///
    /// Unchecked parameters never panic: a zero window simply never fills
    /// and the run comes back flat.
    fn execute(
        &self,
        prices: &[f64],
        params: &StrategyParameters,
        sink: &mut dyn EventSink,
    ) -> TradeOutcome;

    /// Validate parameters for this variant.
    fn check_params(&self, params: &StrategyParameters) -> Result<(), SimError> {
        params.validate()?;
        if params.allow_short && !self.supports_short_selling() {
            return Err(SimError::invalid(format!(
                "{} does not support short selling",
                self.kind()
            )));
        }
        Ok(())
    }

    /// Validate, then simulate while reporting fills to `sink`.
    fn simulate_with(
        &self,
        prices: &[f64],
        params: &StrategyParameters,
        sink: &mut dyn EventSink,
    ) -> Result<TradeOutcome, SimError> {
        self.check_params(params)?;
        Ok(self.execute(prices, params, sink))
    }

    fn simulate(
        &self,
        prices: &[f64],
        params: &StrategyParameters,
    ) -> Result<TradeOutcome, SimError> {
        self.simulate_with(prices, params, &mut NoopSink)
    }
}

/// Identifies a strategy variant in configs, results and CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    SimpleMovingAverage,
    BollingerBands,
    MeanReversion,
}

static SIMPLE_MOVING_AVERAGE: SimpleMovingAverage = SimpleMovingAverage;
static BOLLINGER_BANDS: BollingerBands = BollingerBands;
static MEAN_REVERSION: MeanReversion = MeanReversion;

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::SimpleMovingAverage,
        StrategyKind::BollingerBands,
        StrategyKind::MeanReversion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SimpleMovingAverage => "simple_moving_average",
            Self::BollingerBands => "bollinger_bands",
            Self::MeanReversion => "mean_reversion",
        }
    }

    pub fn simulator(&self) -> &'static dyn Simulator {
        match self {
            Self::SimpleMovingAverage => &SIMPLE_MOVING_AVERAGE,
            Self::BollingerBands => &BOLLINGER_BANDS,
            Self::MeanReversion => &MEAN_REVERSION,
        }
    }

    pub fn supports_short_selling(&self) -> bool {
        self.simulator().supports_short_selling()
    }

    pub fn simulate(
        &self,
        prices: &[f64],
        params: &StrategyParameters,
    ) -> Result<TradeOutcome, SimError> {
        self.simulator().simulate(prices, params)
    }

    pub fn simulate_with(
        &self,
        prices: &[f64],
        params: &StrategyParameters,
        sink: &mut dyn EventSink,
    ) -> Result<TradeOutcome, SimError> {
        self.simulator().simulate_with(prices, params, sink)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "simple_moving_average" | "sma" => Ok(Self::SimpleMovingAverage),
            "bollinger_bands" | "bollinger" | "bb" => Ok(Self::BollingerBands),
            "mean_reversion" | "mr" => Ok(Self::MeanReversion),
            other => Err(SimError::invalid(format!("unknown strategy '{other}'"))),
        }
    }
}

/// The action the strategy takes on the final day of `prices`, if any.
///
/// This is the "what should I do today" view of a backtest: the series ends
/// at the latest close, so a fill on the last index is today's signal.
pub fn advise(
    kind: StrategyKind,
    prices: &[f64],
    params: &StrategyParameters,
) -> Result<Option<TradeEvent>, SimError> {
    let mut events: Vec<TradeEvent> = Vec::new();
    kind.simulate_with(prices, params, &mut events)?;
    let Some(today) = prices.len().checked_sub(1) else {
        return Ok(None);
    };
    Ok(events.into_iter().rev().find(|e| e.day_index == today))
}

/// Round to whole cents.
pub(crate) fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeAction;

    #[test]
    fn kind_round_trips_through_name() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.name().parse::<StrategyKind>().unwrap(), kind);
            assert_eq!(kind.simulator().kind(), kind);
        }
    }

    #[test]
    fn kind_accepts_short_aliases() {
        let parse = |s: &str| s.parse::<StrategyKind>().unwrap();
        assert_eq!(parse("sma"), StrategyKind::SimpleMovingAverage);
        assert_eq!(parse("Bollinger-Bands"), StrategyKind::BollingerBands);
        assert_eq!(parse("mr"), StrategyKind::MeanReversion);
        assert!("donchian".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&StrategyKind::MeanReversion).unwrap();
        assert_eq!(json, "\"mean_reversion\"");
    }

    #[test]
    fn only_bollinger_supports_short_selling() {
        assert!(!StrategyKind::SimpleMovingAverage.supports_short_selling());
        assert!(StrategyKind::BollingerBands.supports_short_selling());
        assert!(!StrategyKind::MeanReversion.supports_short_selling());
    }

    #[test]
    fn short_selling_rejected_where_unsupported() {
        let params = StrategyParameters::new(3, 5.0).with_short_selling(true);
        let err = StrategyKind::MeanReversion
            .simulate(&[1.0, 2.0, 3.0, 4.0], &params)
            .unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(StrategyKind::BollingerBands
            .simulate(&[1.0, 2.0, 3.0, 4.0], &params)
            .is_ok());
    }

    #[test]
    fn zero_window_rejected_by_every_variant() {
        let params = StrategyParameters::new(0, 5.0);
        for kind in StrategyKind::ALL {
            assert!(kind.simulate(&[1.0, 2.0], &params).is_err(), "{kind}");
        }
    }

    #[test]
    fn unchecked_zero_window_runs_flat() {
        let params = StrategyParameters::new(0, 5.0);
        let prices = [10.0, 11.0, 9.0, 8.0, 12.0];
        for kind in StrategyKind::ALL {
            let mut events: Vec<TradeEvent> = Vec::new();
            let outcome = kind.simulator().execute(&prices, &params, &mut events);
            assert!(events.is_empty(), "{kind}");
            assert_eq!(outcome.total_profit, 0.0);
            assert_eq!(outcome.trade_count, 0);
            assert!(outcome.first_entry_price.is_none());
        }
    }

    #[test]
    fn advise_reports_fill_on_last_day() {
        // Window [10, 10, 10]; 12 on the last day crosses above the average.
        let prices = [10.0, 10.0, 10.0, 12.0];
        let params = StrategyParameters::new(3, 0.0);
        let advice = advise(StrategyKind::SimpleMovingAverage, &prices, &params).unwrap();
        let event = advice.expect("expected a buy signal today");
        assert_eq!(event.day_index, 3);
        assert_eq!(event.action, TradeAction::OpenLong);
    }

    #[test]
    fn advise_is_none_without_fill_today() {
        let prices = [10.0, 10.0, 10.0, 12.0, 13.0];
        let params = StrategyParameters::new(3, 0.0);
        assert!(advise(StrategyKind::SimpleMovingAverage, &prices, &params)
            .unwrap()
            .is_none());
        assert!(advise(StrategyKind::SimpleMovingAverage, &[], &params)
            .unwrap()
            .is_none());
    }

    #[test]
    fn round_cents_rounds_to_two_decimals() {
        assert_eq!(round_cents(10.126), 10.13);
        assert_eq!(round_cents(10.124), 10.12);
        assert_eq!(round_cents(7.0), 7.0);
    }
}
