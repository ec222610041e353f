//! Parameter sweep over (window × diff) grids, optionally partitioned.

use rayon::prelude::*;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use closelab_core::StrategyKind;

use crate::error::SweepError;
use crate::grid::{ParamGrid, ParamKey};
use crate::partition::{partition_bounds, PartitionSpec};
use crate::result::{SweepRecord, SweepResult};

/// Cooperative cancellation flag shared between a sweep and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Parameter sweep executor.
///
/// Runs one strategy for every grid combination on every partition,
/// optionally in parallel. Results are merged in grid order, so the
/// parallel and sequential paths produce identical output.
#[derive(Debug, Clone)]
pub struct ParamSweep {
    kind: StrategyKind,
    allow_short: bool,
    parallel: bool,
    cancel: Option<CancelToken>,
}

impl ParamSweep {
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            allow_short: false,
            parallel: true,
            cancel: None,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_short_selling(mut self, allow_short: bool) -> Self {
        self.allow_short = allow_short;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Evaluate `grid` on `prices` according to `partitions`.
    pub fn sweep(
        &self,
        prices: &[f64],
        grid: &ParamGrid,
        partitions: &PartitionSpec,
    ) -> Result<SweepResult, SweepError> {
        match partitions {
            PartitionSpec::Single(count) => self.sweep_partitioned(prices, grid, *count),
            PartitionSpec::Multiple(counts) => {
                if counts.is_empty() {
                    return Err(SweepError::invalid("partition list is empty"));
                }
                let mut acc: Option<SweepResult> = None;
                for &count in counts {
                    let next = self.sweep_partitioned(prices, grid, count)?;
                    acc = Some(match acc {
                        None => next,
                        Some(prev) => prev.combine(&next)?,
                    });
                }
                let total = acc.unwrap_or_default();
                Ok(total.averaged(counts.len()))
            }
        }
    }

    /// Evaluate `grid` over `count` partitions and average across them.
    ///
    /// `count == 0` runs once on the whole series and is not averaged.
    pub fn sweep_partitioned(
        &self,
        prices: &[f64],
        grid: &ParamGrid,
        count: usize,
    ) -> Result<SweepResult, SweepError> {
        let segments = self.sweep_segments(prices, grid, count)?;
        let mut iter = segments.iter();
        let Some(first) = iter.next() else {
            return Err(SweepError::Configuration(
                "partitioning produced no segments".to_string(),
            ));
        };

        let mut acc = first.clone();
        for next in iter {
            acc = acc.combine(next)?;
        }

        if count == 0 {
            Ok(acc)
        } else {
            Ok(acc.averaged(count))
        }
    }

    /// One unaveraged result per partition, in partition order.
    pub fn sweep_segments(
        &self,
        prices: &[f64],
        grid: &ParamGrid,
        count: usize,
    ) -> Result<Vec<SweepResult>, SweepError> {
        grid.validate()?;
        let keys = grid.combinations();
        if let Some(first) = keys.first() {
            self.kind.simulator().check_params(&first.to_params(self.allow_short))?;
        }

        let bounds = partition_bounds(prices.len(), count);
        let jobs: Vec<(usize, ParamKey)> = (0..bounds.len())
            .flat_map(|segment| keys.iter().map(move |&key| (segment, key)))
            .collect();

        tracing::info!(
            strategy = %self.kind,
            prices = prices.len(),
            partitions = bounds.len(),
            combinations = keys.len(),
            jobs = jobs.len(),
            parallel = self.parallel,
            "running parameter sweep"
        );

        let records = self.run_jobs(prices, &bounds, &jobs)?;

        records
            .chunks(keys.len())
            .map(|chunk| SweepResult::from_records(chunk.to_vec()))
            .collect()
    }

    fn run_jobs(
        &self,
        prices: &[f64],
        bounds: &[Range<usize>],
        jobs: &[(usize, ParamKey)],
    ) -> Result<Vec<SweepRecord>, SweepError> {
        let total = jobs.len();
        let completed = AtomicUsize::new(0);

        let run = |&(segment, key): &(usize, ParamKey)| -> Result<SweepRecord, SweepError> {
            if self.is_cancelled() {
                return Err(SweepError::Cancelled {
                    completed: completed.load(Ordering::Relaxed),
                    total,
                });
            }
            let slice = &prices[bounds[segment].clone()];
            let outcome = self
                .kind
                .simulate(slice, &key.to_params(self.allow_short))?;
            completed.fetch_add(1, Ordering::Relaxed);
            Ok(SweepRecord::from_outcome(key, &outcome))
        };

        let result = if self.parallel {
            jobs.par_iter().map(run).collect::<Result<Vec<_>, _>>()
        } else {
            jobs.iter().map(run).collect::<Result<Vec<_>, _>>()
        };

        if let Err(SweepError::Cancelled { completed, total }) = &result {
            tracing::warn!(
                strategy = %self.kind,
                completed,
                total,
                "parameter sweep cancelled"
            );
        }
        result
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}
