//! Classical Variables Sampling
//!
//! ```text
//! std_dev     = population_value * 0.15
//! sample_size = min(ceil((z * std_dev / tolerable_error)^2), population_size)
//! ```

use auditcalc_core::{CalcError, CalcResult, ConfidenceLevel};
use rust_decimal::Decimal;

use crate::engine::ceil_count;
use crate::input::{ClassicalInput, RequiredFields, SamplingMethod};
use crate::result::{ClassicalTrace, SamplingResult, SamplingTrace};

/// Assumed population standard deviation as a share of population value.
///
/// A fixed simplification. It is not derived from the dispersion of the
/// actual items.
pub const ASSUMED_STD_DEV_RATIO: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Two-sided z-value for a confidence level (1.65 / 1.96 / 2.58)
pub fn z_value(confidence: ConfidenceLevel) -> Decimal {
    match confidence {
        ConfidenceLevel::Ninety => Decimal::from_parts(165, 0, 0, false, 2),
        ConfidenceLevel::NinetyFive => Decimal::from_parts(196, 0, 0, false, 2),
        ConfidenceLevel::NinetyNine => Decimal::from_parts(258, 0, 0, false, 2),
    }
}

pub fn compute(input: &ClassicalInput) -> CalcResult<SamplingResult> {
    let mut fields = RequiredFields::new();
    let population_size = fields.count("population_size", input.population_size);
    let population_value = fields.positive("population_value", input.population_value)?;
    let tolerable_error = fields.positive("tolerable_error", input.tolerable_error)?;

    if let Some(missing) = fields.missing() {
        return Ok(SamplingResult::incomplete(
            SamplingMethod::ClassicalVariables,
            missing,
        ));
    }

    let z = z_value(input.confidence_level);
    let overflow = || CalcError::degenerate("classical variables sample size overflow");

    let assumed_std_dev = population_value
        .checked_mul(ASSUMED_STD_DEV_RATIO)
        .ok_or_else(overflow)?;
    let numerator = z.checked_mul(assumed_std_dev).ok_or_else(overflow)?;
    let ratio = numerator
        .checked_div(tolerable_error)
        .ok_or_else(|| CalcError::degenerate("z * std_dev / tolerable_error"))?;

    // Square before dividing so an exact result is not nudged over an integer
    let raw_sample_size = numerator
        .checked_mul(numerator)
        .and_then(|n| {
            tolerable_error
                .checked_mul(tolerable_error)
                .and_then(|d| n.checked_div(d))
        })
        .ok_or_else(overflow)?;

    let uncapped = ceil_count(raw_sample_size, "classical variables sample size")?;
    let sample_size = uncapped.min(population_size);

    let trace = ClassicalTrace {
        confidence_level: input.confidence_level.percent(),
        z_value: z,
        assumed_std_dev,
        ratio,
        raw_sample_size,
        uncapped_sample_size: uncapped,
        capped: sample_size < uncapped,
    };

    Ok(SamplingResult::complete(
        SamplingMethod::ClassicalVariables,
        sample_size,
        SamplingTrace::ClassicalVariables(trace),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(size: u64, value: Decimal, tolerable: Decimal, cl: ConfidenceLevel) -> ClassicalInput {
        ClassicalInput {
            population_size: Some(size),
            population_value: Some(value),
            tolerable_error: Some(tolerable),
            confidence_level: cl,
        }
    }

    fn trace_of(result: &SamplingResult) -> &ClassicalTrace {
        match result.trace.as_ref() {
            Some(SamplingTrace::ClassicalVariables(t)) => t,
            other => panic!("expected classical trace, got {:?}", other),
        }
    }

    #[test]
    fn test_z_values() {
        assert_eq!(z_value(ConfidenceLevel::Ninety), dec!(1.65));
        assert_eq!(z_value(ConfidenceLevel::NinetyFive), dec!(1.96));
        assert_eq!(z_value(ConfidenceLevel::NinetyNine), dec!(2.58));
    }

    #[test]
    fn test_reference_example() {
        let result = compute(&input(
            10_000,
            dec!(5000000),
            dec!(250000),
            ConfidenceLevel::NinetyFive,
        ))
        .unwrap();

        let trace = trace_of(&result);
        assert_eq!(trace.assumed_std_dev, dec!(750000));
        assert_eq!(trace.ratio, dec!(5.88));
        assert_eq!(trace.raw_sample_size, dec!(34.5744));
        assert_eq!(result.sample_size, 35);
        assert!(!trace.capped);
    }

    #[test]
    fn test_capped_at_population_size() {
        let result = compute(&input(
            20,
            dec!(5000000),
            dec!(250000),
            ConfidenceLevel::NinetyFive,
        ))
        .unwrap();

        let trace = trace_of(&result);
        assert_eq!(result.sample_size, 20);
        assert_eq!(trace.uncapped_sample_size, 35);
        assert!(trace.capped);
    }

    #[test]
    fn test_higher_confidence_larger_sample() {
        let at = |cl| {
            compute(&input(100_000, dec!(5000000), dec!(250000), cl))
                .unwrap()
                .sample_size
        };
        assert!(at(ConfidenceLevel::Ninety) < at(ConfidenceLevel::NinetyFive));
        assert!(at(ConfidenceLevel::NinetyFive) < at(ConfidenceLevel::NinetyNine));
    }

    #[test]
    fn test_large_tolerable_error_still_samples_one_item() {
        let result = compute(&input(
            1000,
            dec!(1000),
            dec!(1000000),
            ConfidenceLevel::Ninety,
        ))
        .unwrap();
        assert_eq!(result.sample_size, 1);
    }

    #[test]
    fn test_missing_population_size_is_incomplete() {
        let mut partial = input(1, dec!(5000000), dec!(250000), ConfidenceLevel::NinetyFive);
        partial.population_size = None;
        let result = compute(&partial).unwrap();
        assert_eq!(result.sample_size, 0);
        assert_eq!(result.missing_fields(), &["population_size"]);
    }

    #[test]
    fn test_negative_tolerable_error_is_invalid() {
        let err = compute(&input(
            100,
            dec!(1000),
            dec!(-5),
            ConfidenceLevel::NinetyFive,
        ))
        .unwrap_err();
        assert!(err.is_invalid_input());
    }
}
