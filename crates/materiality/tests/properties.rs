use auditcalc_core::{BenchmarkType, Percentage};
use auditcalc_materiality::{MaterialityEngine, MaterialityInputs, MaterialityThresholds};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Cents up to one trillion
fn benchmark_value() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Hundredths of a percent in [0, 100]
fn percentage() -> impl Strategy<Value = Percentage> {
    (0i64..=10_000).prop_map(|hundredths| Percentage::new(Decimal::new(hundredths, 2)).unwrap())
}

fn inputs(
    value: Decimal,
    overall: Percentage,
    performance: Percentage,
    trivial: Percentage,
) -> MaterialityInputs {
    MaterialityInputs::new(BenchmarkType::TotalAssets, value, overall, performance, trivial)
}

proptest! {
    #[test]
    fn overall_is_benchmark_times_percentage(
        value in benchmark_value(),
        overall in percentage(),
        performance in percentage(),
        trivial in percentage(),
    ) {
        let result = MaterialityEngine::default()
            .compute(&inputs(value, overall, performance, trivial))
            .unwrap();
        prop_assert_eq!(
            result.thresholds.overall,
            value * overall.value() / Decimal::ONE_HUNDRED
        );
    }

    #[test]
    fn derived_thresholds_never_exceed_overall(
        value in benchmark_value(),
        overall in percentage(),
        performance in percentage(),
        trivial in percentage(),
    ) {
        let t = MaterialityEngine::default()
            .compute(&inputs(value, overall, performance, trivial))
            .unwrap()
            .thresholds;
        prop_assert!(t.performance <= t.overall, "{} > {}", t.performance, t.overall);
        prop_assert!(t.clearly_trivial <= t.overall, "{} > {}", t.clearly_trivial, t.overall);
        prop_assert!(t.clearly_trivial >= Decimal::ZERO);
    }

    #[test]
    fn computation_is_idempotent(
        value in benchmark_value(),
        overall in percentage(),
        performance in percentage(),
        trivial in percentage(),
    ) {
        let engine = MaterialityEngine::default();
        let i = inputs(value, overall, performance, trivial);
        let first = engine.compute(&i).unwrap();
        let second = engine.compute(&i).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(i.fingerprint(), i.clone().fingerprint());
    }

    #[test]
    fn non_positive_benchmark_is_all_zero(
        cents in -100_000_000_000i64..=0,
        overall in percentage(),
        performance in percentage(),
        trivial in percentage(),
    ) {
        let result = MaterialityEngine::default()
            .compute(&inputs(Decimal::new(cents, 2), overall, performance, trivial))
            .unwrap();
        prop_assert_eq!(result.thresholds, MaterialityThresholds::ZERO);
        prop_assert!(!result.is_approvable());
    }
}
