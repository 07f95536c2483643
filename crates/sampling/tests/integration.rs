//! Integration tests for the sampling engine public API

use auditcalc_core::ConfidenceLevel;
use auditcalc_sampling::{
    compute_sampling, AttributeInput, ClassicalInput, MusInput, SamplingEngine, SamplingInput,
    SamplingStatus, SamplingTrace,
};
use rust_decimal_macros::dec;

#[test]
fn test_reference_examples_from_json() -> anyhow::Result<()> {
    let cases = [
        (
            r#"{"method":"mus","population_value":"5000000","tolerable_error":"250000","expected_misstatements":0,"confidence_level":95}"#,
            61,
        ),
        (
            r#"{"method":"classical_variables","population_size":10000,"population_value":"5000000","tolerable_error":"250000","confidence_level":95}"#,
            35,
        ),
        (
            r#"{"method":"attribute","population_size":500,"expected_error_rate":"2","confidence_level":95}"#,
            215,
        ),
    ];

    for (json, expected) in cases {
        let input: SamplingInput = serde_json::from_str(json)?;
        let result = compute_sampling(&input)?;
        assert_eq!(result.sample_size, expected, "input: {}", json);
        assert_eq!(result.status, SamplingStatus::Complete);
    }

    Ok(())
}

#[test]
fn test_result_serializes_with_trace() -> anyhow::Result<()> {
    let input = SamplingInput::Mus(MusInput {
        population_value: Some(dec!(5000000)),
        tolerable_error: Some(dec!(250000)),
        expected_misstatements: 0,
        confidence_level: ConfidenceLevel::NinetyFive,
    });
    let result = compute_sampling(&input)?;

    let value = serde_json::to_value(&result)?;
    assert_eq!(value["method"], "mus");
    assert_eq!(value["sample_size"], 61);
    assert_eq!(value["status"]["status"], "complete");
    assert_eq!(value["trace"]["sampling_interval"], "83333");
    assert_eq!(value["trace"]["factor_fallback"], false);

    Ok(())
}

#[test]
fn test_degenerate_mus_never_returns_size() {
    let input = SamplingInput::Mus(MusInput {
        population_value: Some(dec!(5000000)),
        tolerable_error: Some(dec!(1)),
        expected_misstatements: 0,
        confidence_level: ConfidenceLevel::NinetyFive,
    });
    let err = compute_sampling(&input).unwrap_err();
    assert!(err.is_degenerate());
}

#[test]
fn test_live_entry_sequence_never_errors() {
    // Simulates a user filling in the MUS form one field at a time
    let engine = SamplingEngine::new();
    let mut input = MusInput::default();

    let r = engine.compute(&input.clone().into()).unwrap();
    assert_eq!(r.sample_size, 0);

    input.population_value = Some(dec!(5000000));
    let r = engine.compute(&input.clone().into()).unwrap();
    assert_eq!(r.sample_size, 0);
    assert_eq!(r.missing_fields(), &["tolerable_error"]);

    input.tolerable_error = Some(dec!(250000));
    let r = engine.compute(&input.into()).unwrap();
    assert_eq!(r.sample_size, 61);
}

#[test]
fn test_sizes_positive_and_within_population() {
    let engine = SamplingEngine::new();

    for cl in ConfidenceLevel::ALL {
        for size in [1u64, 7, 35, 120, 500, 10_000] {
            let classical = engine
                .compute(&SamplingInput::ClassicalVariables(ClassicalInput {
                    population_size: Some(size),
                    population_value: Some(dec!(2500000)),
                    tolerable_error: Some(dec!(50000)),
                    confidence_level: cl,
                }))
                .unwrap();
            assert!(classical.sample_size >= 1);
            assert!(classical.sample_size <= size);

            for rate in [dec!(0), dec!(1.5), dec!(4), dec!(20)] {
                let attribute = engine
                    .compute(&SamplingInput::Attribute(AttributeInput {
                        population_size: Some(size),
                        expected_error_rate: Some(rate),
                        confidence_level: cl,
                    }))
                    .unwrap();
                assert!(attribute.sample_size >= 1);
                assert!(attribute.sample_size <= size);
            }
        }
    }
}

#[test]
fn test_underflowing_raw_size_still_samples_one_item() {
    let mus = compute_sampling(&SamplingInput::Mus(MusInput {
        population_value: Some(dec!(0.01)),
        tolerable_error: Some(dec!(1000000000000000000000000000)),
        expected_misstatements: 0,
        confidence_level: ConfidenceLevel::NinetyFive,
    }))
    .unwrap();
    assert_eq!(mus.status, SamplingStatus::Complete);
    assert_eq!(mus.sample_size, 1);

    let classical = compute_sampling(&SamplingInput::ClassicalVariables(ClassicalInput {
        population_size: Some(100),
        population_value: Some(dec!(0.0000001)),
        tolerable_error: Some(dec!(100000000000000)),
        confidence_level: ConfidenceLevel::NinetyFive,
    }))
    .unwrap();
    assert_eq!(classical.status, SamplingStatus::Complete);
    assert_eq!(classical.sample_size, 1);
}

#[test]
fn test_classical_trace_reports_cap() {
    let result = compute_sampling(&SamplingInput::ClassicalVariables(ClassicalInput {
        population_size: Some(7),
        population_value: Some(dec!(2500000)),
        tolerable_error: Some(dec!(50000)),
        confidence_level: ConfidenceLevel::NinetyNine,
    }))
    .unwrap();

    match result.trace {
        Some(SamplingTrace::ClassicalVariables(trace)) => {
            assert!(trace.capped);
            assert!(trace.uncapped_sample_size > 7);
            assert_eq!(result.sample_size, 7);
        }
        other => panic!("expected classical trace, got {:?}", other),
    }
}
