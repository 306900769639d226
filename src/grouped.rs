//! One aggregate per grouping key
//!
//! [`Grouped`] owns a separate aggregator instance for every key it sees, so
//! rows for different keys never share state.

use crate::traits::{Aggregator, FinalizeError};

#[cfg(feature = "std")]
use std::{collections::BTreeMap, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, vec::Vec};

/// Keyed collection of independent aggregators
///
/// A fresh aggregator is created by the factory the first time a key appears.
/// Results are reported in key order.
///
/// # Example
///
/// ```
/// use flowagg::grouped::Grouped;
/// use flowagg::median::StreamingMedian;
///
/// let mut by_sensor = Grouped::new(StreamingMedian::new);
///
/// for (sensor, reading) in [("a", 3.0), ("b", 10.0), ("a", 1.0), ("a", 2.0)] {
///     by_sensor.consume(sensor, reading);
/// }
///
/// assert_eq!(by_sensor.finalize(&"a"), Some(Ok(2.0)));
/// assert_eq!(by_sensor.finalize(&"b"), Some(Ok(10.0)));
/// assert_eq!(by_sensor.finalize(&"c"), None);
/// ```
#[derive(Clone, Debug)]
pub struct Grouped<K: Ord, A: Aggregator> {
    groups: BTreeMap<K, A>,
    factory: fn() -> A,
}

impl<K: Ord, A: Aggregator + Default> Default for Grouped<K, A> {
    fn default() -> Self {
        Self::new(A::default)
    }
}

impl<K: Ord, A: Aggregator> Grouped<K, A> {
    /// Create an empty collection that builds aggregators with `factory`
    pub fn new(factory: fn() -> A) -> Self {
        Self {
            groups: BTreeMap::new(),
            factory,
        }
    }

    /// Feed a row into the aggregator for `key`
    pub fn consume(&mut self, key: K, input: A::Input) {
        let factory = self.factory;
        self.groups.entry(key).or_insert_with(factory).consume(input);
    }

    /// The aggregator for `key`, if any row has been seen for it
    pub fn get(&self, key: &K) -> Option<&A> {
        self.groups.get(key)
    }

    /// Finalize the aggregate for one key
    pub fn finalize(&self, key: &K) -> Option<Result<f64, FinalizeError>> {
        self.groups.get(key).map(Aggregator::finalize)
    }

    /// Finalize every key, in key order
    pub fn finalize_all(&self) -> Vec<(K, Result<f64, FinalizeError>)>
    where
        K: Clone,
    {
        self.groups
            .iter()
            .map(|(key, agg)| (key.clone(), agg.finalize()))
            .collect()
    }

    /// Reset every aggregator in place, keeping the keys
    pub fn reset(&mut self) {
        tracing::trace!(groups = self.groups.len(), "resetting grouped aggregates");
        for agg in self.groups.values_mut() {
            agg.reset();
        }
    }

    /// Drop every group
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Iterate over keys in order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no group exists
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Approximate memory usage of the aggregators, excluding keys
    pub fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.groups.values().map(A::size_bytes).sum::<usize>()
    }
}
