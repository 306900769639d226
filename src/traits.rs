//! Core traits for streaming aggregates
//!
//! Every aggregate implements the base [`Aggregator`] trait. Inputs that may be
//! missing are carried as a [`Field`], which pairs a value with an explicit
//! presence flag.

use core::fmt::Debug;

/// Error returned when an aggregate cannot produce a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeError {
    /// The aggregate was finalized before it accepted any input
    EmptySequence {
        /// Name of the aggregate that was finalized
        aggregate: &'static str,
    },
    /// Every input offered to the aggregate was rejected as malformed
    AllRejected {
        /// Name of the aggregate that was finalized
        aggregate: &'static str,
        /// Number of inputs rejected
        rejected: u64,
    },
}

impl core::fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FinalizeError::EmptySequence { aggregate } => {
                write!(f, "cannot finalize {} over an empty sequence", aggregate)
            }
            FinalizeError::AllRejected {
                aggregate,
                rejected,
            } => write!(
                f,
                "cannot finalize {}: all {} inputs were rejected",
                aggregate, rejected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FinalizeError {}

/// A numeric input together with its presence flag
///
/// Hosts that track nullability feed values through this type instead of a
/// sentinel. NaN values are treated as missing, whatever the flag says.
///
/// ```
/// use flowagg::traits::Field;
///
/// assert_eq!(Field::new(2.5).get(), Some(2.5));
/// assert_eq!(Field::absent().get(), None);
/// assert_eq!(Field::from(None::<f64>).get(), None);
/// assert_eq!(Field::from(f64::NAN).get(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    /// Raw value; meaningless when `present` is false
    pub value: f64,
    /// Whether `value` is available for this row
    pub present: bool,
}

impl Field {
    /// A present value
    pub fn new(value: f64) -> Self {
        Self {
            value,
            present: true,
        }
    }

    /// A missing value
    pub fn absent() -> Self {
        Self {
            value: 0.0,
            present: false,
        }
    }

    /// The value, if it is present and not NaN
    pub fn get(&self) -> Option<f64> {
        if self.present && !self.value.is_nan() {
            Some(self.value)
        } else {
            None
        }
    }

    /// Check whether the field carries a usable value
    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Option<f64>> for Field {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Self::new(v),
            None => Self::absent(),
        }
    }
}

/// Core trait for all single-pass aggregates
///
/// The lifecycle is `new()` (or `Default`), repeated [`consume`](Aggregator::consume),
/// then [`finalize`](Aggregator::finalize). [`reset`](Aggregator::reset) returns the
/// instance to its initial state so it can be reused for another sequence.
///
/// Aggregates cannot be merged: each instance sees exactly one ordered pass
/// over its input.
pub trait Aggregator: Clone + Debug {
    /// The input accepted per row
    type Input;

    /// Feed one row into the aggregate
    fn consume(&mut self, input: Self::Input);

    /// Produce the final scalar for the sequence consumed so far
    ///
    /// Degenerate but well-defined results (for example a correlation over a
    /// single pair) are reported as `Ok(f64::NAN)`. Only contract violations,
    /// such as the median of nothing, return an error.
    fn finalize(&self) -> Result<f64, FinalizeError>;

    /// Reset to the freshly initialized state
    fn reset(&mut self);

    /// Number of inputs accepted since the last reset
    fn count(&self) -> u64;

    /// Approximate memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Check if no input has been accepted
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Feed every row of an iterator, in order
    fn consume_all<I>(&mut self, inputs: I)
    where
        I: IntoIterator<Item = Self::Input>,
        Self: Sized,
    {
        for input in inputs {
            self.consume(input);
        }
    }
}
