//! Sampling engine - dispatch over the three methods

use auditcalc_core::{CalcError, CalcResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::input::SamplingInput;
use crate::reliability::ReliabilityFactorTable;
use crate::result::SamplingResult;
use crate::{attribute, classical, mus};

/// Stateless sample size calculator.
///
/// Holds only the reliability table; identical inputs always produce
/// identical results.
#[derive(Debug, Clone, Default)]
pub struct SamplingEngine {
    table: ReliabilityFactorTable,
}

impl SamplingEngine {
    /// Create an engine with the standard reliability table
    pub fn new() -> Self {
        Self {
            table: ReliabilityFactorTable::standard(),
        }
    }

    pub fn table(&self) -> &ReliabilityFactorTable {
        &self.table
    }

    /// Compute a sample size for any method
    pub fn compute(&self, input: &SamplingInput) -> CalcResult<SamplingResult> {
        let result = match input {
            SamplingInput::Mus(i) => mus::compute(&self.table, i),
            SamplingInput::ClassicalVariables(i) => classical::compute(i),
            SamplingInput::Attribute(i) => attribute::compute(&self.table, i),
        };

        match &result {
            Ok(r) if r.is_complete() => {
                tracing::debug!(
                    method = %r.method,
                    confidence = %input.confidence_level(),
                    sample_size = r.sample_size,
                    "Sample size computed"
                );
            }
            Ok(r) => {
                tracing::debug!(
                    method = %r.method,
                    missing = ?r.missing_fields(),
                    "Sampling inputs incomplete"
                );
            }
            Err(e) => {
                tracing::debug!(
                    method = %input.method(),
                    error = %e,
                    "Sampling computation failed"
                );
            }
        }

        result
    }
}

/// Compute a sample size with the standard table
pub fn compute_sampling(input: &SamplingInput) -> CalcResult<SamplingResult> {
    SamplingEngine::new().compute(input)
}

/// Round a raw size up to a whole item count.
///
/// Callers have already checked their inputs are positive, so a raw size
/// that underflows to zero still needs at least one item.
pub(crate) fn ceil_count(raw: Decimal, what: &str) -> CalcResult<u64> {
    if raw < Decimal::ZERO {
        return Err(CalcError::degenerate(format!("{} {} is negative", what, raw)));
    }
    raw.ceil()
        .to_u64()
        .map(|count| count.max(1))
        .ok_or_else(|| CalcError::degenerate(format!("{} {} is not representable", what, raw)))
}
