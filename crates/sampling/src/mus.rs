//! Monetary Unit Sampling
//!
//! ```text
//! interval    = floor(tolerable_error / reliability_factor)
//! sample_size = ceil(population_value / interval)
//! ```
//!
//! The interval is floored, never rounded, so it can only get smaller and the
//! sample larger.

use auditcalc_core::{CalcError, CalcResult};

use crate::engine::ceil_count;
use crate::input::{MusInput, RequiredFields, SamplingMethod};
use crate::reliability::ReliabilityFactorTable;
use crate::result::{MusTrace, SamplingResult, SamplingTrace};

pub fn compute(table: &ReliabilityFactorTable, input: &MusInput) -> CalcResult<SamplingResult> {
    let mut fields = RequiredFields::new();
    let population_value = fields.positive("population_value", input.population_value)?;
    let tolerable_error = fields.positive("tolerable_error", input.tolerable_error)?;

    if let Some(missing) = fields.missing() {
        return Ok(SamplingResult::incomplete(SamplingMethod::Mus, missing));
    }

    let lookup = table.lookup(input.confidence_level, input.expected_misstatements);
    if lookup.fallback {
        tracing::warn!(
            expected_misstatements = input.expected_misstatements,
            factor = %lookup.factor,
            "Expected misstatements beyond reliability table, using fallback factor"
        );
    }

    let sampling_interval = tolerable_error
        .checked_div(lookup.factor)
        .ok_or_else(|| CalcError::degenerate("tolerable_error / reliability_factor"))?
        .floor();

    if sampling_interval.is_zero() {
        return Err(CalcError::degenerate(format!(
            "sampling interval is zero (tolerable error {} is smaller than reliability factor {})",
            tolerable_error, lookup.factor
        )));
    }

    let raw_sample_size = population_value
        .checked_div(sampling_interval)
        .ok_or_else(|| CalcError::degenerate("population_value / sampling_interval"))?;
    let sample_size = ceil_count(raw_sample_size, "MUS sample size")?;

    let trace = MusTrace {
        confidence_level: input.confidence_level.percent(),
        expected_misstatements: input.expected_misstatements,
        reliability_factor: lookup.factor,
        factor_fallback: lookup.fallback,
        sampling_interval,
        raw_sample_size,
    };

    Ok(SamplingResult::complete(
        SamplingMethod::Mus,
        sample_size,
        SamplingTrace::Mus(trace),
    ))
}
