//! Running median
//!
//! This module provides an exact streaming median that is updated one value
//! at a time and can be read at any point without sorting.
//!
//! # Algorithms
//!
//! - [`StreamingMedian`]: Two-heap running median, O(log n) per value
//!
//! # Example
//!
//! ```
//! use flowagg::median::StreamingMedian;
//! use flowagg::traits::Aggregator;
//!
//! let mut median = StreamingMedian::new();
//!
//! for value in [7.0, 1.0, 4.0, 9.0] {
//!     median.consume(value);
//! }
//!
//! assert_eq!(median.finalize(), Ok(5.5));
//! ```

mod two_heap;

pub use two_heap::StreamingMedian;
