//! Running Pearson correlation
//!
//! Computes the correlation of paired values in a single pass using Welford's
//! co-moment updates rather than raw power sums, which avoids catastrophic
//! cancellation when values sit far from zero.

use crate::math;
use crate::traits::{Aggregator, Field, FinalizeError};

/// Power sums of the accepted pairs
///
/// These are the five sums of the textbook one-pass formula. They are derived
/// on demand from the running moments, so they are exact only up to rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawSums {
    /// Sum of x
    pub sum_x: f64,
    /// Sum of y
    pub sum_y: f64,
    /// Sum of x squared
    pub sum_xx: f64,
    /// Sum of y squared
    pub sum_yy: f64,
    /// Sum of x times y
    pub sum_xy: f64,
}

/// Running Pearson correlation over `(x, y)` pairs
///
/// A pair is accepted only when both sides are present and not NaN; a pair
/// with either side missing leaves every statistic untouched.
///
/// [`finalize`](Aggregator::finalize) returns `Ok(f64::NAN)` when fewer than
/// two pairs were accepted or when either series is constant, since the
/// correlation is undefined there.
///
/// # Example
///
/// ```
/// use flowagg::correlation::CorrelationAccumulator;
/// use flowagg::traits::{Aggregator, Field};
///
/// let mut corr = CorrelationAccumulator::new();
///
/// corr.add(1.0, 2.0);
/// corr.add(2.0, 4.0);
/// corr.consume((Field::new(3.0), Field::new(6.0)));
/// corr.consume((Field::new(4.0), Field::absent())); // skipped
///
/// assert_eq!(corr.len(), 3);
/// assert!((corr.finalize().unwrap() - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct CorrelationAccumulator {
    /// Number of accepted pairs
    count: u64,
    /// Running mean of x
    mean_x: f64,
    /// Running mean of y
    mean_y: f64,
    /// Sum of squared deviations of x from its mean
    m2_x: f64,
    /// Sum of squared deviations of y from its mean
    m2_y: f64,
    /// Sum of co-deviations of x and y from their means
    c_xy: f64,
}

impl Default for CorrelationAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            mean_x: 0.0,
            mean_y: 0.0,
            m2_x: 0.0,
            m2_y: 0.0,
            c_xy: 0.0,
        }
    }

    /// Offer a pair with explicit presence flags
    ///
    /// The pair is dropped unless both flags are set.
    pub fn consume_flagged(&mut self, x: f64, x_present: bool, y: f64, y_present: bool) {
        self.consume_fields(
            Field {
                value: x,
                present: x_present,
            },
            Field {
                value: y,
                present: y_present,
            },
        );
    }

    /// Offer a pair of fields; dropped unless both are present
    pub fn consume_fields(&mut self, x: Field, y: Field) {
        if let (Some(x), Some(y)) = (x.get(), y.get()) {
            self.push(x, y);
        }
    }

    /// Add a pair where both values are known to be present
    ///
    /// NaN on either side drops the pair.
    pub fn add(&mut self, x: f64, y: f64) {
        self.consume_fields(Field::new(x), Field::new(y));
    }

    fn push(&mut self, x: f64, y: f64) {
        self.count += 1;
        let n = self.count as f64;

        let dx = x - self.mean_x;
        self.mean_x += dx / n;
        let dy = y - self.mean_y;
        self.mean_y += dy / n;

        // Each co-moment uses the old deviation times the new one
        self.m2_x += dx * (x - self.mean_x);
        self.m2_y += dy * (y - self.mean_y);
        self.c_xy += dx * (y - self.mean_y);
    }

    /// Number of accepted pairs
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean of the accepted x values
    pub fn mean_x(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_x)
        }
    }

    /// Mean of the accepted y values
    pub fn mean_y(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_y)
        }
    }

    /// Population variance of x
    pub fn variance_x(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2_x / self.count as f64)
        }
    }

    /// Population variance of y
    pub fn variance_y(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2_y / self.count as f64)
        }
    }

    /// Population covariance of x and y
    pub fn covariance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.c_xy / self.count as f64)
        }
    }

    /// The five power sums of the accepted pairs
    pub fn raw_sums(&self) -> RawSums {
        let n = self.count as f64;
        RawSums {
            sum_x: self.mean_x * n,
            sum_y: self.mean_y * n,
            sum_xx: self.m2_x + n * self.mean_x * self.mean_x,
            sum_yy: self.m2_y + n * self.mean_y * self.mean_y,
            sum_xy: self.c_xy + n * self.mean_x * self.mean_y,
        }
    }

    /// Pearson correlation coefficient, NaN when undefined
    pub fn correlation(&self) -> f64 {
        if self.count < 2 || self.m2_x <= 0.0 || self.m2_y <= 0.0 {
            return f64::NAN;
        }

        let r = self.c_xy / (math::sqrt(self.m2_x) * math::sqrt(self.m2_y));
        // Rounding can push a perfect fit a hair past the bounds
        r.clamp(-1.0, 1.0)
    }
}

impl Aggregator for CorrelationAccumulator {
    type Input = (Field, Field);

    fn consume(&mut self, input: (Field, Field)) {
        self.consume_fields(input.0, input.1);
    }

    fn finalize(&self) -> Result<f64, FinalizeError> {
        let r = self.correlation();
        if r.is_nan() {
            tracing::debug!(
                pairs = self.count,
                "correlation undefined: too few pairs or a constant series"
            );
        }
        Ok(r)
    }

    fn reset(&mut self) {
        tracing::trace!(discarded = self.count, "resetting correlation accumulator");
        *self = Self::new();
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }
}
