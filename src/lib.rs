//! # Flowagg
//!
//! Single-pass streaming aggregates for Rust.
//!
//! Flowagg computes statistics over a sequence of values or `(x, y)` pairs as
//! they arrive, without buffering the sequence for a second pass. It is meant to
//! sit underneath a query or aggregation engine that keeps one aggregate per
//! grouping key, feeds it rows, and reads back a single scalar.
//!
//! ## Aggregates
//!
//! - **Median**: Exact running median with two balanced heaps
//! - **Correlation**: Pearson correlation from Welford co-moments
//! - **Concordance**: Concordant/discordant counts over consecutive pairs
//!
//! Every aggregate follows the same lifecycle through the
//! [`Aggregator`](traits::Aggregator) trait: construct, `consume` rows,
//! `finalize`, and optionally `reset` to reuse the instance.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowagg::prelude::*;
//!
//! let mut median = StreamingMedian::new();
//! for latency_ms in [12.0, 48.0, 7.0, 31.0, 19.0] {
//!     median.consume(latency_ms);
//! }
//! assert_eq!(median.finalize(), Ok(19.0));
//!
//! let mut corr = CorrelationAccumulator::new();
//! corr.consume((Field::new(1.0), Field::new(2.0)));
//! corr.consume((Field::new(2.0), Field::from(None::<f64>))); // missing, skipped
//! corr.consume((Field::new(3.0), Field::new(6.0)));
//! assert!((corr.finalize().unwrap() - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Missing values and degenerate results
//!
//! - The median of an empty sequence is an error
//!   ([`FinalizeError::EmptySequence`](traits::FinalizeError::EmptySequence)).
//! - A correlation or concordance over fewer than two pairs, or a correlation
//!   with a constant series, finalizes to `Ok(f64::NAN)`.
//! - NaN inputs are treated as missing and never reach the running state.
//!
//! ## Feature Flags
//!
//! Aggregate families (all enabled by default):
//! - `median`: [`StreamingMedian`]
//! - `correlation`: [`CorrelationAccumulator`]
//! - `concordance`: [`SequentialConcordanceEstimator`]
//! - `full`: Enable everything
//!
//! Platform features:
//! - `std` (default): Standard library support; without it the crate is
//!   `no_std` + `alloc` and routes math through `libm`

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits always available
pub mod traits;

pub mod grouped;
pub mod kind;

#[cfg(feature = "correlation")]
pub(crate) mod math;

#[cfg(feature = "median")]
#[cfg_attr(docsrs, doc(cfg(feature = "median")))]
pub mod median;

#[cfg(feature = "correlation")]
#[cfg_attr(docsrs, doc(cfg(feature = "correlation")))]
pub mod correlation;

#[cfg(feature = "concordance")]
#[cfg_attr(docsrs, doc(cfg(feature = "concordance")))]
pub mod concordance;

pub mod prelude {
    pub use crate::grouped::Grouped;
    pub use crate::kind::AggregateKind;
    pub use crate::traits::*;

    #[cfg(feature = "median")]
    pub use crate::median::StreamingMedian;

    #[cfg(feature = "correlation")]
    pub use crate::correlation::CorrelationAccumulator;

    #[cfg(feature = "concordance")]
    pub use crate::concordance::SequentialConcordanceEstimator;
}

#[cfg(feature = "median")]
pub use median::StreamingMedian;

#[cfg(feature = "correlation")]
pub use correlation::CorrelationAccumulator;

#[cfg(feature = "concordance")]
pub use concordance::SequentialConcordanceEstimator;
