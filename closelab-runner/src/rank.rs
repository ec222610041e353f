//! Ranking sweep results by total profit.

use serde::{Deserialize, Serialize};

use crate::error::SweepError;
use crate::result::{SweepRecord, SweepResult};

/// Direction of the profit comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Highest profit first.
    #[default]
    Descending,
    /// Lowest profit first.
    Ascending,
}

/// Output of `rank`.
#[derive(Debug, Clone)]
pub enum Ranking {
    /// Every combination, unordered introspection (`top_k == -1`).
    All(SweepResult),
    /// The best `top_k` combinations, best first.
    Top(Vec<SweepRecord>),
}

impl Ranking {
    pub fn len(&self) -> usize {
        match self {
            Self::All(result) => result.len(),
            Self::Top(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self, Self::Top(_))
    }

    /// Records in ranked order (`Top`) or grid order (`All`).
    pub fn into_records(self) -> Vec<SweepRecord> {
        match self {
            Self::All(result) => result.into_records(),
            Self::Top(records) => records,
        }
    }
}

/// `-1` returns everything; `0..` returns that many best records by
/// total profit; anything below `-1` is rejected.
pub fn rank(result: SweepResult, top_k: i64) -> Result<Ranking, SweepError> {
    match top_k {
        -1 => Ok(Ranking::All(result)),
        k if k < -1 => Err(SweepError::invalid(format!(
            "top_k must be -1 or non-negative, got {k}"
        ))),
        k => {
            let n = usize::try_from(k).unwrap_or(usize::MAX);
            Ok(Ranking::Top(rank_by(&result, n, SortOrder::Descending)))
        }
    }
}

/// Stable sort by total profit in `order`, keeping the first `n`.
/// Ties keep grid order.
pub fn rank_by(result: &SweepResult, n: usize, order: SortOrder) -> Vec<SweepRecord> {
    let mut sorted: Vec<SweepRecord> = result.records().to_vec();
    sorted.sort_by(|a, b| match order {
        SortOrder::Descending => b.total_profit.total_cmp(&a.total_profit),
        SortOrder::Ascending => a.total_profit.total_cmp(&b.total_profit),
    });
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(profits: &[f64]) -> SweepResult {
        let records = profits
            .iter()
            .enumerate()
            .map(|(i, &p)| SweepRecord {
                window_days: i + 1,
                percent_diff: 1.0,
                total_profit: p,
                percent_gain: p,
                first_entry_price: None,
                sample_count: 1,
            })
            .collect();
        SweepResult::from_records(records).unwrap()
    }

    #[test]
    fn minus_one_returns_everything() {
        let ranking = rank(result(&[1.0, 3.0, 2.0]), -1).unwrap();
        assert!(!ranking.is_ordered());
        assert_eq!(ranking.len(), 3);
    }

    #[test]
    fn below_minus_one_is_invalid() {
        let err = rank(result(&[1.0]), -2).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn top_k_is_descending() {
        let ranking = rank(result(&[1.0, 3.0, 2.0, 5.0]), 2).unwrap();
        let profits: Vec<f64> = ranking.into_records().iter().map(|r| r.total_profit).collect();
        assert_eq!(profits, vec![5.0, 3.0]);
    }

    #[test]
    fn top_k_larger_than_result_returns_all() {
        let ranking = rank(result(&[1.0, 2.0]), 10).unwrap();
        assert!(ranking.is_ordered());
        assert_eq!(ranking.len(), 2);
        assert!(rank(result(&[1.0, 2.0]), 0).unwrap().is_empty());
    }

    #[test]
    fn ties_keep_grid_order() {
        let records = rank_by(&result(&[2.0, 7.0, 2.0, 7.0]), 4, SortOrder::Descending);
        let windows: Vec<usize> = records.iter().map(|r| r.window_days).collect();
        assert_eq!(windows, vec![2, 4, 1, 3]);
    }

    #[test]
    fn ascending_gives_lowest() {
        let records = rank_by(&result(&[4.0, -1.0, 9.0, 0.0]), 2, SortOrder::Ascending);
        let profits: Vec<f64> = records.iter().map(|r| r.total_profit).collect();
        assert_eq!(profits, vec![-1.0, 0.0]);
    }
}
