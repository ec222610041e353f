//! Fixed-capacity FIFO window over the most recent prices.
//!
//! Shared by all three simulators: the window holds the prices *before* the
//! current day, so callers read `full_mean()` first and `push()` the day's
//! price afterwards.
//!
//! The mean is re-summed from the window contents, oldest first, on every
//! call. A running sum drifts once values have been added and subtracted
//! (`0.1 + 0.2 + 0.3 - 0.1 != 0.2 + 0.3`), and that drift flips threshold
//! comparisons on ties. Summing the live values in order gives exactly
//! `prices[i - w..i].iter().sum() / w`.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub(crate) struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    /// A zero-capacity window never fills, so `full_mean()` is always `None`.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append a value, evicting the oldest once the window exceeds capacity.
    pub(crate) fn push(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    fn is_full(&self) -> bool {
        self.capacity > 0 && self.values.len() == self.capacity
    }

    /// Mean of the current contents, `None` when empty.
    pub(crate) fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
        }
    }

    /// Mean only once the window holds exactly `capacity` values.
    pub(crate) fn full_mean(&self) -> Option<f64> {
        if self.is_full() {
            self.mean()
        } else {
            None
        }
    }
}
