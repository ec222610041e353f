//! Splitting a price series into contiguous partitions.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How many partitions to evaluate a grid over.
///
/// `Single(0)` means "the whole series, unaveraged". `Multiple` runs the
/// single-count sweep once per entry and averages across entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionSpec {
    Single(usize),
    Multiple(Vec<usize>),
}

impl Default for PartitionSpec {
    fn default() -> Self {
        Self::Single(0)
    }
}

impl From<usize> for PartitionSpec {
    fn from(count: usize) -> Self {
        Self::Single(count)
    }
}

impl From<Vec<usize>> for PartitionSpec {
    fn from(counts: Vec<usize>) -> Self {
        Self::Multiple(counts)
    }
}

/// Index ranges for `count` partitions over a series of length `len`.
///
/// `count == 0` yields the whole series. Otherwise each partition is
/// `len / count` long and the last one absorbs the remainder. Partitions
/// may be empty when `count > len`.
pub fn partition_bounds(len: usize, count: usize) -> Vec<Range<usize>> {
    if count == 0 {
        return vec![0..len];
    }

    let length = len / count;
    (0..count)
        .map(|i| {
            let start = i * length;
            let end = if i + 1 == count { len } else { start + length };
            start..end
        })
        .collect()
}
