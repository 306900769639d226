//! Rank concordance over arrival order
//!
//! - [`SequentialConcordanceEstimator`]: compares each `(x, y)` pair with the
//!   one before it and reports a tau-like statistic in O(1) memory
//!
//! This is deliberately not the all-pairs Kendall's tau, which needs the whole
//! sequence. See the type documentation for how the two differ.

mod sequential;

pub use sequential::{Direction, SequentialConcordanceEstimator};
