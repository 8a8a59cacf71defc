//! Fixed-capacity measurement history used for trend charts.
//!
//! The window is a FIFO: appends go to the back, and once the buffer is full
//! the oldest entry is evicted first.  Index 0 is always the oldest retained
//! sample.  Filling up is normal operation, not an error.
//!
//! ## Access discipline
//!
//! The only writer is the sampling cycle; the only readers are chart and
//! report generation.  Both run on the main cooperative loop, so no locking
//! is involved.  Nothing else may hold a reference across a loop pass.

use heapless::Deque;

use crate::measurement::Measurement;

/// Reference window size (samples).
pub const HISTORY_CAPACITY: usize = 50;

/// Ring buffer of the last `N` measurements, oldest first.
#[derive(Debug, Clone)]
pub struct MeasurementHistory<const N: usize = HISTORY_CAPACITY> {
    window: Deque<Measurement, N>,
}

impl<const N: usize> Default for MeasurementHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MeasurementHistory<N> {
    pub const fn new() -> Self {
        Self {
            window: Deque::new(),
        }
    }

    /// Append a measurement, evicting the oldest one when full.
    pub fn append(&mut self, m: Measurement) {
        if self.window.is_full() {
            self.window.pop_front();
        }
        // A slot is guaranteed free at this point.
        let _ = self.window.push_back(m);
    }

    /// The current window, oldest first.  Non-destructive.
    pub fn to_series(&self) -> impl Iterator<Item = &Measurement> + '_ {
        self.window.iter()
    }

    /// Most recent measurement, if any.
    pub fn latest(&self) -> Option<&Measurement> {
        self.window.back()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
