//! Two-heap running median
//!
//! Keeps the lower half of the stream in a max-heap and the upper half in a
//! min-heap so the median is always available from the heap tops.

use crate::traits::{Aggregator, FinalizeError};
use core::cmp::{Ordering, Reverse};

#[cfg(feature = "std")]
use std::collections::BinaryHeap;

#[cfg(not(feature = "std"))]
use alloc::collections::BinaryHeap;

/// Heap entry with a total order over `f64`
///
/// NaN never reaches the heaps, so `total_cmp` agrees with `<` on every value
/// stored except for `-0.0 < 0.0`, which does not affect the median.
#[derive(Clone, Copy, Debug)]
struct Ordered(f64);

impl PartialEq for Ordered {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ordered {}

impl PartialOrd for Ordered {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ordered {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Exact running median over a stream of `f64`
///
/// Every value is retained, split across two heaps:
///
/// - `low` is a max-heap holding the smaller half
/// - `high` is a min-heap holding the larger half
///
/// Every element of `low` is `<=` every element of `high`, and `low` holds
/// either the same number of elements as `high` or exactly one more. The
/// median is the top of `low` when the count is odd, and the mean of the two
/// tops when it is even.
///
/// Inserting is O(log n); reading the median is O(1). Memory grows linearly
/// with the number of values consumed.
///
/// NaN values are rejected since they have no position in the ordering.
/// Each rejection logs a warning and is counted in
/// [`rejected`](StreamingMedian::rejected); a stream of nothing but NaN
/// finalizes to [`FinalizeError::AllRejected`]. Hosts that track missing
/// values should filter them before calling [`consume`](Aggregator::consume).
///
/// # Example
///
/// ```
/// use flowagg::median::StreamingMedian;
/// use flowagg::traits::Aggregator;
///
/// let mut median = StreamingMedian::new();
///
/// for value in [5.0, 1.0, 3.0, 2.0, 4.0] {
///     median.consume(value);
/// }
///
/// assert_eq!(median.finalize(), Ok(3.0));
///
/// median.reset();
/// median.consume(3.0);
/// assert_eq!(median.finalize(), Ok(3.0));
/// ```
#[derive(Clone, Debug)]
pub struct StreamingMedian {
    /// Lower half, largest on top
    low: BinaryHeap<Ordered>,
    /// Upper half, smallest on top
    high: BinaryHeap<Reverse<Ordered>>,
    /// Median of everything consumed so far
    current: f64,
    /// Number of values consumed
    count: u64,
    /// Number of NaN values rejected
    rejected: u64,
}

impl Default for StreamingMedian {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingMedian {
    /// Create an empty median estimator
    pub fn new() -> Self {
        Self {
            low: BinaryHeap::new(),
            high: BinaryHeap::new(),
            current: 0.0,
            count: 0,
            rejected: 0,
        }
    }

    /// Create an estimator with room for `capacity` values before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        let half = capacity / 2 + 1;
        Self {
            low: BinaryHeap::with_capacity(half),
            high: BinaryHeap::with_capacity(half),
            current: 0.0,
            count: 0,
            rejected: 0,
        }
    }

    /// Add a value to the stream
    ///
    /// NaN values are rejected and counted.
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            self.rejected += 1;
            tracing::warn!(rejected = self.rejected, "median rejected a NaN value");
            return;
        }

        if self.count == 0 {
            self.low.push(Ordered(value));
            self.current = value;
            self.count = 1;
            return;
        }

        if value < self.current {
            self.low.push(Ordered(value));
        } else if value > self.current {
            self.high.push(Reverse(Ordered(value)));
        } else if self.high.len() < self.low.len() {
            self.high.push(Reverse(Ordered(value)));
        } else {
            self.low.push(Ordered(value));
        }

        self.rebalance();
        self.current = self.compute_median();
        self.count += 1;
    }

    /// Restore the size invariant: `low` equal to `high` or one larger
    fn rebalance(&mut self) {
        while self.high.len() > self.low.len() {
            match self.high.pop() {
                Some(Reverse(v)) => self.low.push(v),
                None => break,
            }
        }
        while self.low.len() > self.high.len() + 1 {
            match self.low.pop() {
                Some(v) => self.high.push(Reverse(v)),
                None => break,
            }
        }
    }

    fn compute_median(&self) -> f64 {
        match (self.low.peek(), self.high.peek()) {
            (Some(lo), Some(Reverse(hi))) if self.low.len() == self.high.len() => {
                (lo.0 + hi.0) / 2.0
            }
            (Some(lo), _) => lo.0,
            (None, Some(Reverse(hi))) => hi.0,
            (None, None) => 0.0,
        }
    }

    /// Get the current median, or `None` before any value is consumed
    pub fn median(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.current)
        }
    }

    /// Number of values consumed
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of NaN values rejected since the last reset
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

impl Aggregator for StreamingMedian {
    type Input = f64;

    fn consume(&mut self, input: f64) {
        self.add(input);
    }

    fn finalize(&self) -> Result<f64, FinalizeError> {
        match self.median() {
            Some(median) => Ok(median),
            None if self.rejected > 0 => {
                tracing::warn!(
                    rejected = self.rejected,
                    "median finalized with every value rejected"
                );
                Err(FinalizeError::AllRejected {
                    aggregate: "median",
                    rejected: self.rejected,
                })
            }
            None => {
                tracing::warn!("median finalized over an empty sequence");
                Err(FinalizeError::EmptySequence { aggregate: "median" })
            }
        }
    }

    fn reset(&mut self) {
        tracing::trace!(discarded = self.count, "resetting streaming median");
        self.low.clear();
        self.high.clear();
        self.current = 0.0;
        self.count = 0;
        self.rejected = 0;
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
            + self.low.capacity() * core::mem::size_of::<Ordered>()
            + self.high.capacity() * core::mem::size_of::<Reverse<Ordered>>()
    }
}
