//! Concordance between consecutive pairs
//!
//! Each incoming `(x, y)` pair is compared only with the pair that arrived
//! immediately before it. The result resembles Kendall's tau in form but is
//! not the same statistic: tau compares every pair of observations, while
//! this estimator performs `n - 1` adjacent comparisons in arrival order.

use crate::traits::{Aggregator, FinalizeError};
use core::cmp::Ordering;

/// Outcome of comparing a pair with its predecessor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Both coordinates moved the same way
    Concordant,
    /// The coordinates moved in opposite directions
    Discordant,
    /// At least one coordinate did not move
    Tied,
}

impl Direction {
    /// Classify the move from `prev` to `next`
    pub fn between(prev: (f64, f64), next: (f64, f64)) -> Self {
        let dx = next.0.partial_cmp(&prev.0);
        let dy = next.1.partial_cmp(&prev.1);
        match (dx, dy) {
            (Some(Ordering::Greater), Some(Ordering::Greater))
            | (Some(Ordering::Less), Some(Ordering::Less)) => Direction::Concordant,
            (Some(Ordering::Greater), Some(Ordering::Less))
            | (Some(Ordering::Less), Some(Ordering::Greater)) => Direction::Discordant,
            _ => Direction::Tied,
        }
    }
}

/// Sequential concordance estimator over `(x, y)` pairs
///
/// Counts how often consecutive pairs move together (concordant) or apart
/// (discordant). Ties on either axis count toward neither, but every accepted
/// pair counts toward `n`. The statistic is
///
/// ```text
/// (concordant - discordant) / (n * (n - 1) / 2)
/// ```
///
/// which is NaN for fewer than two pairs. Because at most `n - 1`
/// comparisons are made, the magnitude is at most `2 / n`.
///
/// Pairs with a NaN coordinate are rejected: they leave `n` and the previous
/// pair untouched, log a warning, and are counted in
/// [`rejected`](SequentialConcordanceEstimator::rejected).
///
/// # Example
///
/// ```
/// use flowagg::concordance::SequentialConcordanceEstimator;
/// use flowagg::traits::Aggregator;
///
/// let mut est = SequentialConcordanceEstimator::new();
///
/// est.consume((1.0, 1.0));
/// est.consume((2.0, 2.0)); // concordant
/// est.consume((1.0, 3.0)); // discordant
///
/// assert_eq!(est.concordant(), 1);
/// assert_eq!(est.discordant(), 1);
/// assert_eq!(est.finalize(), Ok(0.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SequentialConcordanceEstimator {
    /// Number of accepted pairs
    count: u64,
    /// Comparisons where both axes moved the same way
    concordant: u64,
    /// Comparisons where the axes moved in opposite directions
    discordant: u64,
    /// Most recently accepted pair
    previous: Option<(f64, f64)>,
    /// Pairs rejected for a NaN coordinate
    rejected: u64,
}

impl SequentialConcordanceEstimator {
    /// Create an empty estimator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair, returning how it compared with its predecessor
    ///
    /// Returns `None` for the first pair and for rejected pairs; check
    /// [`rejected`](Self::rejected) to tell the two apart.
    pub fn add(&mut self, x: f64, y: f64) -> Option<Direction> {
        if x.is_nan() || y.is_nan() {
            self.rejected += 1;
            tracing::warn!(
                rejected = self.rejected,
                "concordance rejected a pair with a NaN coordinate"
            );
            return None;
        }

        let direction = self.previous.map(|prev| Direction::between(prev, (x, y)));
        match direction {
            Some(Direction::Concordant) => self.concordant += 1,
            Some(Direction::Discordant) => self.discordant += 1,
            Some(Direction::Tied) | None => {}
        }

        self.previous = Some((x, y));
        self.count += 1;
        direction
    }

    /// Number of accepted pairs
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of concordant comparisons
    pub fn concordant(&self) -> u64 {
        self.concordant
    }

    /// Number of discordant comparisons
    pub fn discordant(&self) -> u64 {
        self.discordant
    }

    /// Number of comparisons tied on at least one axis
    pub fn ties(&self) -> u64 {
        self.count.saturating_sub(1) - self.concordant - self.discordant
    }

    /// Number of pairs rejected since the last reset
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// The most recently accepted pair
    pub fn previous(&self) -> Option<(f64, f64)> {
        self.previous
    }

    /// Concordance statistic, NaN when fewer than two pairs were accepted
    pub fn tau(&self) -> f64 {
        if self.count < 2 {
            return f64::NAN;
        }
        let n = self.count as f64;
        let net = self.concordant as f64 - self.discordant as f64;
        net / (0.5 * n * (n - 1.0))
    }
}

impl Aggregator for SequentialConcordanceEstimator {
    type Input = (f64, f64);

    fn consume(&mut self, input: (f64, f64)) {
        self.add(input.0, input.1);
    }

    fn finalize(&self) -> Result<f64, FinalizeError> {
        if self.count < 2 {
            tracing::debug!(
                pairs = self.count,
                "concordance undefined for fewer than two pairs"
            );
        }
        Ok(self.tau())
    }

    fn reset(&mut self) {
        tracing::trace!(discarded = self.count, "resetting concordance estimator");
        *self = Self::new();
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }
}
