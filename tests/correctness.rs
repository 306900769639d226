//! Correctness and invariant tests for flowagg
//!
//! These tests verify the lifecycle contract, edge cases, and properties that
//! must hold for every input sequence. They complement the unit tests in each
//! module by checking aggregates against naive reference computations.
//!
//! Run with: cargo test --test correctness --features full

// Require all features
#[cfg(not(all(feature = "median", feature = "correlation", feature = "concordance")))]
compile_error!(
    "Correctness tests require all features. Run: cargo test --test correctness --features full"
);

use flowagg::concordance::{Direction, SequentialConcordanceEstimator};
use flowagg::correlation::CorrelationAccumulator;
use flowagg::grouped::Grouped;
use flowagg::kind::AggregateKind;
use flowagg::median::StreamingMedian;
use flowagg::traits::{Aggregator, Field, FinalizeError};

fn reference_median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn reference_pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        sxx += (x - mx) * (x - mx);
        syy += (y - my) * (y - my);
        sxy += (x - mx) * (y - my);
    }
    sxy / (sxx.sqrt() * syy.sqrt())
}

// ============================================================================
// Streaming Median
// ============================================================================

mod median {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arrival_order_scenario_then_reset() {
        let mut m = StreamingMedian::new();
        m.consume_all([5.0, 1.0, 3.0, 2.0, 4.0]);

        assert_eq!(m.finalize(), Ok(3.0));

        m.reset();
        m.consume(3.0);

        assert_eq!(
            m.finalize(),
            Ok(3.0),
            "After reset the median must only reflect the new sequence"
        );
    }

    #[test]
    fn empty_finalize_fails_loudly() {
        let m = StreamingMedian::new();

        assert_eq!(
            m.finalize(),
            Err(FinalizeError::EmptySequence { aggregate: "median" })
        );
    }

    #[test]
    fn empty_after_reset_fails_loudly() {
        let mut m = StreamingMedian::new();
        m.consume(1.0);
        m.reset();

        assert!(m.finalize().is_err());
    }

    #[test]
    fn all_nan_input_is_not_reported_as_empty() {
        let mut m = StreamingMedian::new();
        m.consume_all([f64::NAN, f64::NAN]);

        assert_eq!(m.rejected(), 2);
        assert_eq!(
            m.finalize(),
            Err(FinalizeError::AllRejected {
                aggregate: "median",
                rejected: 2,
            })
        );
    }

    #[test]
    fn even_count_averages_middle_values() {
        let mut m = StreamingMedian::new();
        m.consume_all([8.0, 2.0, 6.0, 4.0]);

        assert_eq!(m.finalize(), Ok(5.0));
    }

    #[test]
    fn large_stream_matches_reference() {
        let values: Vec<f64> = (0..10_001).map(|i| ((i * 7919) % 10_007) as f64).collect();

        let mut m = StreamingMedian::with_capacity(values.len());
        m.consume_all(values.iter().copied());

        assert_eq!(m.finalize(), Ok(reference_median(&values)));
    }

    #[test]
    fn many_repeated_values() {
        let mut m = StreamingMedian::new();
        for i in 0..1000 {
            m.consume((i % 3) as f64);
        }

        // 334 zeros, 333 ones, 333 twos
        assert_eq!(m.finalize(), Ok(1.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn matches_sorted_reference(values in proptest::collection::vec(-1e6_f64..1e6, 1..200)) {
            let mut m = StreamingMedian::new();
            m.consume_all(values.iter().copied());

            prop_assert_eq!(m.finalize(), Ok(reference_median(&values)));
        }

        #[test]
        fn every_prefix_matches_reference(values in proptest::collection::vec(-100i32..100, 1..60)) {
            let values: Vec<f64> = values.into_iter().map(f64::from).collect();
            let mut m = StreamingMedian::new();
            for (i, &v) in values.iter().enumerate() {
                m.consume(v);
                prop_assert_eq!(m.median(), Some(reference_median(&values[..=i])));
            }
        }

        #[test]
        fn final_median_is_order_invariant(
            values in proptest::collection::vec(-1e3_f64..1e3, 1..100)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let (original, permuted) = values;
            let mut a = StreamingMedian::new();
            let mut b = StreamingMedian::new();
            a.consume_all(original);
            b.consume_all(permuted);

            prop_assert_eq!(a.finalize(), b.finalize());
        }

        #[test]
        fn singleton_is_its_own_median(value in proptest::num::f64::NORMAL) {
            let mut m = StreamingMedian::new();
            m.consume(value);

            prop_assert_eq!(m.finalize(), Ok(value));
        }
    }
}

// ============================================================================
// Pearson Correlation
// ============================================================================

mod correlation {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn perfect_linear_scenario() {
        let mut c = CorrelationAccumulator::new();
        c.consume_all([(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)].map(|(x, y)| (Field::new(x), Field::new(y))));

        let r = c.finalize().unwrap();
        assert!((r - 1.0).abs() < 1e-12, "expected 1.0, got {}", r);
    }

    #[test]
    fn constant_y_is_nan_not_zero() {
        let mut c = CorrelationAccumulator::new();
        for x in [1.0, 2.0, 3.0, 4.0] {
            c.add(x, 9.0);
        }

        let r = c.finalize().unwrap();
        assert!(r.is_nan(), "constant series must finalize to NaN, got {}", r);
    }

    #[test]
    fn fewer_than_two_pairs_is_nan() {
        let mut c = CorrelationAccumulator::new();
        assert!(c.finalize().unwrap().is_nan());

        c.add(3.0, 4.0);
        assert!(c.finalize().unwrap().is_nan());
    }

    #[test]
    fn partial_pairs_do_not_contaminate() {
        let mut clean = CorrelationAccumulator::new();
        let mut noisy = CorrelationAccumulator::new();

        for i in 0..20 {
            let x = i as f64;
            let y = (x * 0.7).sin() * 10.0 + x;
            clean.add(x, y);
            noisy.consume_flagged(x, true, y, true);
            noisy.consume_flagged(x * 1000.0, true, -y, false);
            noisy.consume_flagged(-x, false, y * 1000.0, true);
        }

        assert_eq!(clean.count(), noisy.count());
        assert_eq!(clean.finalize(), noisy.finalize());
    }

    #[test]
    fn reset_matches_fresh_instance() {
        let mut reused = CorrelationAccumulator::new();
        reused.add(10.0, -3.0);
        reused.add(11.0, 5.0);
        reused.reset();

        let mut fresh = CorrelationAccumulator::new();
        for (x, y) in [(1.0, 1.0), (2.0, 3.0), (3.0, 2.0)] {
            reused.add(x, y);
            fresh.add(x, y);
        }

        assert_eq!(reused.finalize(), fresh.finalize());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn positive_slope_is_one(
            xs in proptest::collection::vec(-1e3_f64..1e3, 2..100),
            a in 0.01_f64..100.0,
            b in -1e3_f64..1e3,
        ) {
            prop_assume!(xs.iter().any(|&x| (x - xs[0]).abs() > 1.0));
            let mut c = CorrelationAccumulator::new();
            for &x in &xs {
                c.add(x, a * x + b);
            }

            let r = c.finalize().unwrap();
            prop_assert!((r - 1.0).abs() < 1e-9, "r = {}", r);
        }

        #[test]
        fn negative_slope_is_minus_one(
            xs in proptest::collection::vec(-1e3_f64..1e3, 2..100),
            a in -100.0_f64..-0.01,
            b in -1e3_f64..1e3,
        ) {
            prop_assume!(xs.iter().any(|&x| (x - xs[0]).abs() > 1.0));
            let mut c = CorrelationAccumulator::new();
            for &x in &xs {
                c.add(x, a * x + b);
            }

            let r = c.finalize().unwrap();
            prop_assert!((r + 1.0).abs() < 1e-9, "r = {}", r);
        }

        #[test]
        fn bounded_and_close_to_two_pass(
            pairs in proptest::collection::vec((-1e3_f64..1e3, -1e3_f64..1e3), 3..100)
        ) {
            let mut c = CorrelationAccumulator::new();
            for &(x, y) in &pairs {
                c.add(x, y);
            }

            let r = c.finalize().unwrap();
            let expected = reference_pearson(&pairs);
            prop_assume!(expected.is_finite());
            prop_assert!((-1.0..=1.0).contains(&r));
            prop_assert!((r - expected).abs() < 1e-6, "r = {}, two-pass = {}", r, expected);
        }
    }
}

// ============================================================================
// Sequential Concordance
// ============================================================================

mod concordance {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mixed_direction_scenario() {
        let mut est = SequentialConcordanceEstimator::new();

        assert_eq!(est.add(1.0, 1.0), None);
        assert_eq!(est.add(2.0, 2.0), Some(Direction::Concordant));
        assert_eq!(est.add(1.0, 3.0), Some(Direction::Discordant));

        assert_eq!(est.finalize(), Ok(0.0));
    }

    #[test]
    fn strictly_increasing_counts() {
        let mut est = SequentialConcordanceEstimator::new();
        for i in 0..25 {
            est.consume((i as f64, i as f64 * 0.5));
        }

        assert_eq!(est.concordant(), 24);
        assert_eq!(est.discordant(), 0);
        assert_eq!(est.ties(), 0);

        let expected = 24.0 / (0.5 * 25.0 * 24.0);
        assert!((est.finalize().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn adjacent_not_all_pairs() {
        // Trending upward overall, but the adjacent steps alternate and cancel
        let mut est = SequentialConcordanceEstimator::new();
        est.consume_all([(1.0, 1.0), (3.0, 3.0), (2.0, 4.0), (4.0, 6.0), (3.0, 7.0)]);

        assert_eq!(est.concordant(), 2);
        assert_eq!(est.discordant(), 2);
        assert_eq!(est.finalize(), Ok(0.0));
    }

    #[test]
    fn nan_pair_is_rejected_visibly() {
        let mut est = SequentialConcordanceEstimator::new();
        est.consume_all([(1.0, 1.0), (f64::NAN, 2.0), (2.0, 2.0)]);

        assert_eq!(est.count(), 2);
        assert_eq!(est.rejected(), 1, "a dropped NaN pair must be counted");
        assert_eq!(est.concordant(), 1);
        assert_eq!(est.finalize(), Ok(1.0));
    }

    #[test]
    fn single_pair_is_nan() {
        let mut est = SequentialConcordanceEstimator::new();
        est.consume((1.0, 2.0));

        assert!(est.finalize().unwrap().is_nan());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn counters_account_for_every_comparison(
            pairs in proptest::collection::vec((-5i32..5, -5i32..5), 0..100)
        ) {
            let mut est = SequentialConcordanceEstimator::new();
            for &(x, y) in &pairs {
                est.consume((f64::from(x), f64::from(y)));
            }

            let n = pairs.len() as u64;
            prop_assert_eq!(est.count(), n);
            prop_assert_eq!(
                est.concordant() + est.discordant() + est.ties(),
                n.saturating_sub(1)
            );
        }

        #[test]
        fn matches_adjacent_reference(
            pairs in proptest::collection::vec((-5i32..5, -5i32..5), 2..100)
        ) {
            let mut est = SequentialConcordanceEstimator::new();
            for &(x, y) in &pairs {
                est.consume((f64::from(x), f64::from(y)));
            }

            let mut net = 0i64;
            for w in pairs.windows(2) {
                let s = (w[1].0 - w[0].0).signum() * (w[1].1 - w[0].1).signum();
                net += i64::from(s);
            }
            let n = pairs.len() as f64;
            let expected = net as f64 / (0.5 * n * (n - 1.0));

            prop_assert!((est.finalize().unwrap() - expected).abs() < 1e-12);
        }
    }
}

// ============================================================================
// Grouping and names
// ============================================================================

mod grouped {
    use super::*;

    #[test]
    fn one_instance_per_key() {
        let mut g = Grouped::new(SequentialConcordanceEstimator::new);
        let rows = [
            ("a", (1.0, 1.0)),
            ("b", (5.0, 5.0)),
            ("a", (2.0, 2.0)),
            ("b", (4.0, 6.0)),
        ];
        for (key, pair) in rows {
            g.consume(key, pair);
        }

        // Interleaving must not make "a" compare against "b"'s rows
        assert_eq!(g.get(&"a").map(|e| e.concordant()), Some(1));
        assert_eq!(g.get(&"b").map(|e| e.discordant()), Some(1));
        assert_eq!(g.finalize(&"a"), Some(Ok(1.0)));
        assert_eq!(g.finalize(&"b"), Some(Ok(-1.0)));
    }

    #[test]
    fn names_resolve() {
        assert_eq!("median".parse::<AggregateKind>(), Ok(AggregateKind::Median));
        assert_eq!(
            "sequential_concordance".parse::<AggregateKind>(),
            Ok(AggregateKind::SequentialConcordance)
        );
        assert_eq!(
            "kendall_correlation".parse::<AggregateKind>(),
            Ok(AggregateKind::SequentialConcordance),
            "legacy name must still resolve"
        );
        assert_eq!(
            AggregateKind::SequentialConcordance.to_string(),
            "sequential_concordance"
        );
        assert!("stddev".parse::<AggregateKind>().is_err());
    }
}
