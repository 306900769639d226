//! Names of the available aggregates
//!
//! Lets a host that refers to aggregates by name resolve which one to build.

use core::str::FromStr;

#[cfg(feature = "std")]
use std::string::{String, ToString};

#[cfg(not(feature = "std"))]
use alloc::string::{String, ToString};

/// Error returned when parsing an unknown aggregate name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAggregate(pub String);

impl core::fmt::Display for UnknownAggregate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown aggregate: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownAggregate {}

/// The aggregates this crate implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AggregateKind {
    /// [`StreamingMedian`](crate::median::StreamingMedian)
    Median,
    /// [`CorrelationAccumulator`](crate::correlation::CorrelationAccumulator)
    PearsonCorrelation,
    /// [`SequentialConcordanceEstimator`](crate::concordance::SequentialConcordanceEstimator)
    SequentialConcordance,
}

impl AggregateKind {
    /// Every kind, in declaration order
    pub const ALL: [AggregateKind; 3] = [
        AggregateKind::Median,
        AggregateKind::PearsonCorrelation,
        AggregateKind::SequentialConcordance,
    ];

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            AggregateKind::Median => "median",
            AggregateKind::PearsonCorrelation => "pearson_correlation",
            AggregateKind::SequentialConcordance => "sequential_concordance",
        }
    }

    /// Number of numeric fields consumed per row
    pub fn arity(&self) -> usize {
        match self {
            AggregateKind::Median => 1,
            AggregateKind::PearsonCorrelation | AggregateKind::SequentialConcordance => 2,
        }
    }
}

impl core::fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateKind {
    type Err = UnknownAggregate;

    /// Parse a name, ignoring ASCII case
    ///
    /// `kendall_correlation` is accepted as a legacy alias of
    /// `sequential_concordance`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("kendall_correlation") {
            return Ok(AggregateKind::SequentialConcordance);
        }
        AggregateKind::ALL
            .into_iter()
            .find(|kind| trimmed.eq_ignore_ascii_case(kind.name()))
            .ok_or_else(|| UnknownAggregate(s.to_string()))
    }
}
