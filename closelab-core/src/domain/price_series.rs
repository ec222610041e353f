//! Ordered daily closing prices, index 0 = earliest day.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Immutable sequence of closing prices.
///
/// Values are not validated: NaN or negative prices are the caller's
/// responsibility. The series derefs to `[f64]`, so simulators and
/// partitions borrow plain slices without copying.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Self {
        Self(prices)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Keep only the most recent `limit` prices.
    pub fn tail(&self, limit: usize) -> PriceSeries {
        let start = self.0.len().saturating_sub(limit);
        Self(self.0[start..].to_vec())
    }

    /// Deterministic BLAKE3 hash over the price bytes.
    ///
    /// Used to tag exported results with the dataset they were computed on.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.0.len() as u64).to_le_bytes());
        for price in &self.0 {
            hasher.update(&price.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

impl Deref for PriceSeries {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(prices: Vec<f64>) -> Self {
        Self(prices)
    }
}

impl From<&[f64]> for PriceSeries {
    fn from(prices: &[f64]) -> Self {
        Self(prices.to_vec())
    }
}

impl FromIterator<f64> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
