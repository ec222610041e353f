//! Sweep records and the per-key accumulator that merges partitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use closelab_core::TradeOutcome;

use crate::error::SweepError;
use crate::grid::ParamKey;

/// Aggregated result for one parameter combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub window_days: usize,
    pub percent_diff: f64,
    pub total_profit: f64,
    pub percent_gain: f64,
    pub first_entry_price: Option<f64>,
    /// Number of partition runs folded into this record.
    pub sample_count: usize,
}

impl SweepRecord {
    pub fn from_outcome(key: ParamKey, outcome: &TradeOutcome) -> Self {
        Self {
            window_days: key.window_days,
            percent_diff: key.percent_diff,
            total_profit: outcome.total_profit,
            percent_gain: outcome.return_percentage,
            first_entry_price: outcome.first_entry_price,
            sample_count: 1,
        }
    }

    pub fn key(&self) -> ParamKey {
        ParamKey::new(self.window_days, self.percent_diff)
    }

    /// Sum totals; `self` is the earlier partition.
    fn merged(&self, later: &SweepRecord) -> SweepRecord {
        SweepRecord {
            total_profit: self.total_profit + later.total_profit,
            percent_gain: self.percent_gain + later.percent_gain,
            first_entry_price: self.first_entry_price.or(later.first_entry_price),
            sample_count: self.sample_count + later.sample_count,
            ..*self
        }
    }
}

/// Sweep output keyed by parameter combination, in grid order.
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    records: Vec<SweepRecord>,
    by_key: HashMap<ParamKey, usize>,
}

impl SweepResult {
    pub fn from_records(records: Vec<SweepRecord>) -> Result<Self, SweepError> {
        let mut by_key = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if by_key.insert(record.key(), idx).is_some() {
                return Err(SweepError::Configuration(format!(
                    "duplicate sweep key {}",
                    record.key()
                )));
            }
        }
        Ok(Self { records, by_key })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &ParamKey) -> Option<&SweepRecord> {
        self.by_key.get(key).map(|&idx| &self.records[idx])
    }

    /// Records in insertion (grid) order.
    pub fn records(&self) -> &[SweepRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SweepRecord> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = ParamKey> + '_ {
        self.records.iter().map(SweepRecord::key)
    }

    pub fn into_records(self) -> Vec<SweepRecord> {
        self.records
    }

    /// Merge with a later partition's result into a new accumulator.
    ///
    /// Both inputs must hold the same key set; anything else is a bug in
    /// the partitioning and is reported as a configuration error.
    pub fn combine(&self, later: &SweepResult) -> Result<SweepResult, SweepError> {
        if self.len() != later.len() {
            return Err(SweepError::Configuration(format!(
                "cannot combine sweep results of {} and {} keys",
                self.len(),
                later.len()
            )));
        }

        let records = self
            .records
            .iter()
            .map(|record| {
                let key = record.key();
                later
                    .get(&key)
                    .map(|other| record.merged(other))
                    .ok_or_else(|| {
                        SweepError::Configuration(format!("key {key} missing from partition"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SweepResult {
            records,
            by_key: self.by_key.clone(),
        })
    }

    /// Divide total_profit and percent_gain of every record by `divisor`.
    pub fn averaged(&self, divisor: usize) -> SweepResult {
        let d = divisor.max(1) as f64;
        let records = self
            .records
            .iter()
            .map(|r| SweepRecord {
                total_profit: r.total_profit / d,
                percent_gain: r.percent_gain / d,
                ..*r
            })
            .collect();

        SweepResult {
            records,
            by_key: self.by_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(w: usize, d: f64, profit: f64, first: Option<f64>) -> SweepRecord {
        SweepRecord {
            window_days: w,
            percent_diff: d,
            total_profit: profit,
            percent_gain: profit * 10.0,
            first_entry_price: first,
            sample_count: 1,
        }
    }

    #[test]
    fn lookup_by_key() {
        let result =
            SweepResult::from_records(vec![record(3, 1.0, 2.0, None), record(3, 2.0, 5.0, None)])
                .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(&ParamKey::new(3, 2.0)).unwrap().total_profit, 5.0);
        assert!(result.get(&ParamKey::new(4, 2.0)).is_none());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = SweepResult::from_records(vec![record(3, 1.0, 2.0, None), record(3, 1.0, 5.0, None)])
            .unwrap_err();
        assert!(matches!(err, SweepError::Configuration(_)));
    }

    #[test]
    fn combine_sums_and_keeps_inputs_untouched() {
        let a = SweepResult::from_records(vec![record(3, 1.0, 2.0, None)]).unwrap();
        let b = SweepResult::from_records(vec![record(3, 1.0, 5.0, Some(9.0))]).unwrap();

        let merged = a.combine(&b).unwrap();
        let rec = merged.get(&ParamKey::new(3, 1.0)).unwrap();
        assert_eq!(rec.total_profit, 7.0);
        assert_eq!(rec.percent_gain, 70.0);
        assert_eq!(rec.sample_count, 2);
        assert_eq!(rec.first_entry_price, Some(9.0));

        assert_eq!(a.records()[0].total_profit, 2.0);
        assert_eq!(b.records()[0].total_profit, 5.0);
    }

    #[test]
    fn combine_keeps_earliest_first_entry() {
        let a = SweepResult::from_records(vec![record(3, 1.0, 0.0, Some(4.0))]).unwrap();
        let b = SweepResult::from_records(vec![record(3, 1.0, 0.0, Some(9.0))]).unwrap();
        let merged = a.combine(&b).unwrap();
        assert_eq!(merged.records()[0].first_entry_price, Some(4.0));
    }

    #[test]
    fn combine_rejects_mismatched_keys() {
        let a = SweepResult::from_records(vec![record(3, 1.0, 0.0, None)]).unwrap();
        let b = SweepResult::from_records(vec![record(4, 1.0, 0.0, None)]).unwrap();
        let c = SweepResult::default();
        assert!(matches!(a.combine(&b), Err(SweepError::Configuration(_))));
        assert!(matches!(a.combine(&c), Err(SweepError::Configuration(_))));
    }

    #[test]
    fn averaged_divides_totals_only() {
        let a = SweepResult::from_records(vec![record(3, 1.0, 9.0, Some(2.0))]).unwrap();
        let avg = a.averaged(3);
        let rec = avg.records()[0];
        assert_eq!(rec.total_profit, 3.0);
        assert_eq!(rec.percent_gain, 30.0);
        assert_eq!(rec.first_entry_price, Some(2.0));
        assert_eq!(rec.sample_count, 1);
    }
}
