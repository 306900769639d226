//! Correlation between paired streams
//!
//! This module provides a Pearson correlation that is accumulated one pair at
//! a time in constant memory. Each side of a pair carries a presence flag so
//! rows with a missing value can be skipped without contaminating the result.
//!
//! # Example
//!
//! ```
//! use flowagg::correlation::CorrelationAccumulator;
//! use flowagg::traits::Aggregator;
//!
//! let mut corr = CorrelationAccumulator::new();
//!
//! for x in 0..100 {
//!     let x = x as f64;
//!     corr.add(x, -0.5 * x + 3.0);
//! }
//!
//! let r = corr.finalize().unwrap();
//! assert!((r + 1.0).abs() < 1e-9);
//! ```

mod pearson;

pub use pearson::{CorrelationAccumulator, RawSums};
