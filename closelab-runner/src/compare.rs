//! Run every strategy on several tickers and pick the best ticker per strategy.

use std::collections::BTreeMap;

use closelab_core::{PriceSeries, SimError, StrategyKind, StrategyParameters};

use crate::export::OutcomeRecord;

/// Outcomes of every (ticker, strategy) pair, in input order.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub outcomes: Vec<OutcomeRecord>,
}

impl Comparison {
    /// Highest total profit per strategy; ties go to the earlier ticker.
    pub fn best_by_strategy(&self) -> BTreeMap<StrategyKind, &OutcomeRecord> {
        let mut best: BTreeMap<StrategyKind, &OutcomeRecord> = BTreeMap::new();
        for record in &self.outcomes {
            best.entry(record.strategy)
                .and_modify(|current| {
                    if record.total_profit > current.total_profit {
                        *current = record;
                    }
                })
                .or_insert(record);
        }
        best
    }

    pub fn for_symbol<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a OutcomeRecord> {
        self.outcomes.iter().filter(move |r| r.symbol == symbol)
    }
}

/// Simulate all strategy variants on every ticker with the same parameters.
///
/// `params.allow_short` only applies to variants that support short selling.
pub fn compare_tickers(
    tickers: &[(String, PriceSeries)],
    params: &StrategyParameters,
) -> Result<Comparison, SimError> {
    let mut outcomes = Vec::with_capacity(tickers.len() * StrategyKind::ALL.len());
    for (symbol, prices) in tickers {
        for kind in StrategyKind::ALL {
            let effective = params
                .with_short_selling(params.allow_short && kind.supports_short_selling());
            let outcome = kind.simulate(prices, &effective)?;
            tracing::debug!(
                symbol = %symbol,
                strategy = %kind,
                total_profit = outcome.total_profit,
                "compared ticker"
            );
            outcomes.push(OutcomeRecord::new(symbol.clone(), kind, &effective, &outcome));
        }
    }
    Ok(Comparison { outcomes })
}
