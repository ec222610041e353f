//! Parameter grid: the cartesian product of window sizes and band widths.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use closelab_core::StrategyParameters;

use crate::error::SweepError;

/// Key of one parameter combination.
///
/// `percent_diff` is compared bitwise (with `-0.0` folded into `0.0`), so
/// keys are usable in hash maps even though they carry a float.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParamKey {
    pub window_days: usize,
    pub percent_diff: f64,
}

impl ParamKey {
    pub fn new(window_days: usize, percent_diff: f64) -> Self {
        Self {
            window_days,
            percent_diff,
        }
    }

    fn diff_bits(&self) -> u64 {
        if self.percent_diff == 0.0 {
            0
        } else {
            self.percent_diff.to_bits()
        }
    }

    pub fn to_params(&self, allow_short: bool) -> StrategyParameters {
        StrategyParameters::new(self.window_days, self.percent_diff).with_short_selling(allow_short)
    }
}

impl PartialEq for ParamKey {
    fn eq(&self, other: &Self) -> bool {
        self.window_days == other.window_days && self.diff_bits() == other.diff_bits()
    }
}

impl Eq for ParamKey {}

impl Hash for ParamKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.window_days.hash(state);
        self.diff_bits().hash(state);
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_days_{}_diff", self.window_days, self.percent_diff)
    }
}

/// Candidate values for each swept parameter.
///
/// Combinations are enumerated windows-outer, diffs-inner; that order is
/// the insertion order of every `SweepResult` built from this grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub windows: Vec<usize>,
    pub diffs: Vec<f64>,
}

impl ParamGrid {
    pub fn new(windows: Vec<usize>, diffs: Vec<f64>) -> Self {
        Self { windows, diffs }
    }

    /// Grid with exactly one combination.
    pub fn singleton(window_days: usize, percent_diff: f64) -> Self {
        Self::new(vec![window_days], vec![percent_diff])
    }

    /// Returns the total number of combinations in this grid.
    pub fn size(&self) -> usize {
        self.windows.len() * self.diffs.len()
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if self.windows.is_empty() {
            return Err(SweepError::invalid("window range is empty"));
        }
        if self.diffs.is_empty() {
            return Err(SweepError::invalid("diff range is empty"));
        }
        if self.windows.contains(&0) {
            return Err(SweepError::invalid("window sizes must be > 0"));
        }
        if let Some(bad) = self.diffs.iter().find(|d| !d.is_finite()) {
            return Err(SweepError::invalid(format!("diff {bad} is not finite")));
        }

        let mut seen = HashSet::with_capacity(self.size());
        for key in self.combinations() {
            if !seen.insert(key) {
                return Err(SweepError::invalid(format!("duplicate grid entry {key}")));
            }
        }
        Ok(())
    }

    /// All combinations in insertion order.
    pub fn combinations(&self) -> Vec<ParamKey> {
        self.windows
            .iter()
            .flat_map(|&w| self.diffs.iter().map(move |&d| ParamKey::new(w, d)))
            .collect()
    }
}

impl Default for ParamGrid {
    /// Windows 1..10 and diffs -10..10 (step 1), built fresh on every call.
    fn default() -> Self {
        Self {
            windows: (1..10).collect(),
            diffs: (-10..10).map(f64::from).collect(),
        }
    }
}

/// Integer range `[start, stop)` stepping by `step`.
pub fn int_range(start: usize, stop: usize, step: usize) -> Result<Vec<usize>, SweepError> {
    if step == 0 {
        return Err(SweepError::invalid("range step must be > 0"));
    }
    Ok((start..stop).step_by(step).collect())
}

/// Float range `[start, stop)`; every step is rounded to 3 decimals so that
/// `0.1` increments do not accumulate drift.
pub fn float_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, SweepError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(SweepError::invalid(format!("range step {step} must be > 0")));
    }
    if !(start.is_finite() && stop.is_finite()) {
        return Err(SweepError::invalid("range bounds must be finite"));
    }

    let mut values = Vec::new();
    let mut current = start;
    while current < stop {
        values.push(current);
        let next = round3(current + step);
        if next <= current {
            return Err(SweepError::invalid(format!(
                "range step {step} vanishes after rounding to 3 decimals"
            )));
        }
        current = next;
    }
    Ok(values)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_param_grid_size() {
        let grid = ParamGrid::new(vec![3, 5], vec![-1.0, 0.0, 1.0]);
        // 2 windows × 3 diffs = 6 combinations
        assert_eq!(grid.size(), 6);
        assert_eq!(grid.combinations().len(), 6);
    }

    #[test]
    fn combinations_are_windows_outer() {
        let grid = ParamGrid::new(vec![2, 4], vec![1.0, 2.0]);
        let keys: Vec<(usize, f64)> = grid
            .combinations()
            .iter()
            .map(|k| (k.window_days, k.percent_diff))
            .collect();
        assert_eq!(keys, vec![(2, 1.0), (2, 2.0), (4, 1.0), (4, 2.0)]);
    }

    #[test]
    fn validate_rejects_empty_and_zero() {
        assert!(ParamGrid::new(vec![], vec![1.0]).validate().is_err());
        assert!(ParamGrid::new(vec![1], vec![]).validate().is_err());
        assert!(ParamGrid::new(vec![0, 1], vec![1.0]).validate().is_err());
        assert!(ParamGrid::new(vec![1], vec![f64::NAN]).validate().is_err());
        assert!(ParamGrid::new(vec![3, 3], vec![1.0]).validate().is_err());
        assert!(ParamGrid::default().validate().is_ok());
    }

    #[test]
    fn negative_zero_is_the_same_key() {
        let mut map = HashMap::new();
        map.insert(ParamKey::new(3, 0.0), 1);
        assert_eq!(map.get(&ParamKey::new(3, -0.0)), Some(&1));
        assert_ne!(ParamKey::new(3, 0.1), ParamKey::new(3, 0.2));
        assert_ne!(ParamKey::new(3, 0.1), ParamKey::new(4, 0.1));
    }

    #[test]
    fn default_grid_is_fresh_each_call() {
        let mut a = ParamGrid::default();
        a.windows.push(99);
        assert_eq!(ParamGrid::default().windows, (1..10).collect::<Vec<_>>());
        assert_eq!(ParamGrid::default().size(), 9 * 20);
    }

    #[test]
    fn key_label_matches_legacy_format() {
        assert_eq!(ParamKey::new(3, 5.0).to_string(), "3_days_5_diff");
        assert_eq!(ParamKey::new(7, -0.5).to_string(), "7_days_-0.5_diff");
    }

    #[test]
    fn float_range_rounds_steps() {
        let values = float_range(-0.3, 0.3, 0.1).unwrap();
        assert_eq!(values, vec![-0.3, -0.2, -0.1, 0.0, 0.1, 0.2]);
    }

    #[test]
    fn float_range_counts_match_legacy_sweep() {
        // -20..20 step 0.1 is the diff range the original sweep script used.
        assert_eq!(float_range(-20.0, 20.0, 0.1).unwrap().len(), 400);
    }

    #[test]
    fn float_range_rejects_bad_steps() {
        assert!(float_range(0.0, 1.0, 0.0).is_err());
        assert!(float_range(0.0, 1.0, -0.1).is_err());
        assert!(float_range(0.0, 1.0, 0.0001).is_err());
        assert!(float_range(0.0, f64::INFINITY, 1.0).is_err());
        assert!(float_range(1.0, 0.0, 0.5).unwrap().is_empty());
    }

    #[test]
    fn int_range_steps() {
        assert_eq!(int_range(1, 10, 3).unwrap(), vec![1, 4, 7]);
        assert!(int_range(1, 10, 0).is_err());
    }
}
