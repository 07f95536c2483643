//! Attribute Sampling
//!
//! ```text
//! tolerable_rate = expected_error_rate + 5
//! sample_size    = min(ceil(factor / (tolerable_rate / 100) * population_size / 100), population_size)
//! ```
//!
//! The factor is always the zero-error column of the reliability table.

use auditcalc_core::{CalcError, CalcResult};
use rust_decimal::Decimal;

use crate::engine::ceil_count;
use crate::input::{AttributeInput, RequiredFields, SamplingMethod};
use crate::reliability::ReliabilityFactorTable;
use crate::result::{AttributeTrace, SamplingResult, SamplingTrace};

/// Percentage points added to the expected rate to get the tolerable rate
pub const TOLERABLE_RATE_OFFSET: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

pub fn compute(
    table: &ReliabilityFactorTable,
    input: &AttributeInput,
) -> CalcResult<SamplingResult> {
    let mut fields = RequiredFields::new();
    let population_size = fields.count("population_size", input.population_size);
    let expected_error_rate =
        fields.non_negative("expected_error_rate", input.expected_error_rate)?;

    if let Some(missing) = fields.missing() {
        return Ok(SamplingResult::incomplete(SamplingMethod::Attribute, missing));
    }

    let overflow = || CalcError::degenerate("attribute sample size overflow");

    let tolerable_rate = expected_error_rate
        .checked_add(TOLERABLE_RATE_OFFSET)
        .ok_or_else(overflow)?;
    let reliability_factor = table.factor(input.confidence_level, 0);

    // factor / (rate / 100) * size / 100 reduces to factor * size / rate
    let raw_sample_size = reliability_factor
        .checked_mul(Decimal::from(population_size))
        .ok_or_else(overflow)?
        .checked_div(tolerable_rate)
        .ok_or_else(|| CalcError::degenerate("reliability_factor / tolerable_rate"))?;

    let uncapped = ceil_count(raw_sample_size, "attribute sample size")?;
    let sample_size = uncapped.min(population_size);

    let trace = AttributeTrace {
        confidence_level: input.confidence_level.percent(),
        expected_error_rate,
        tolerable_rate,
        reliability_factor,
        raw_sample_size,
        uncapped_sample_size: uncapped,
        capped: sample_size < uncapped,
    };

    Ok(SamplingResult::complete(
        SamplingMethod::Attribute,
        sample_size,
        SamplingTrace::Attribute(trace),
    ))
}
