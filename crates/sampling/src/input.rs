//! Sampling inputs
//!
//! Each method has its own input struct so fields never leak across formulas.
//! Required numerics are `Option`s: `None` means "not entered yet".

use auditcalc_core::{CalcError, CalcResult, ConfidenceLevel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Sampling method selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    /// Monetary Unit Sampling
    Mus,
    /// Classical Variables Sampling
    #[strum(to_string = "classical_variables", serialize = "classical")]
    ClassicalVariables,
    /// Attribute Sampling (tests of controls)
    Attribute,
}

/// Monetary Unit Sampling inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusInput {
    /// Total recorded book value of the population
    pub population_value: Option<Decimal>,
    /// Tolerable misstatement (usually performance materiality)
    pub tolerable_error: Option<Decimal>,
    /// Number of misstatements the auditor expects to find
    #[serde(default)]
    pub expected_misstatements: u32,
    #[serde(default)]
    pub confidence_level: ConfidenceLevel,
}

/// Classical Variables Sampling inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalInput {
    /// Number of items in the population
    pub population_size: Option<u64>,
    pub population_value: Option<Decimal>,
    pub tolerable_error: Option<Decimal>,
    #[serde(default)]
    pub confidence_level: ConfidenceLevel,
}

/// Attribute Sampling inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInput {
    pub population_size: Option<u64>,
    /// Expected deviation rate in percent (2 means 2%)
    pub expected_error_rate: Option<Decimal>,
    #[serde(default)]
    pub confidence_level: ConfidenceLevel,
}

/// Tagged input, dispatched by method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SamplingInput {
    Mus(MusInput),
    ClassicalVariables(ClassicalInput),
    Attribute(AttributeInput),
}

impl SamplingInput {
    pub fn method(&self) -> SamplingMethod {
        match self {
            SamplingInput::Mus(_) => SamplingMethod::Mus,
            SamplingInput::ClassicalVariables(_) => SamplingMethod::ClassicalVariables,
            SamplingInput::Attribute(_) => SamplingMethod::Attribute,
        }
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        match self {
            SamplingInput::Mus(i) => i.confidence_level,
            SamplingInput::ClassicalVariables(i) => i.confidence_level,
            SamplingInput::Attribute(i) => i.confidence_level,
        }
    }
}

impl From<MusInput> for SamplingInput {
    fn from(input: MusInput) -> Self {
        SamplingInput::Mus(input)
    }
}

impl From<ClassicalInput> for SamplingInput {
    fn from(input: ClassicalInput) -> Self {
        SamplingInput::ClassicalVariables(input)
    }
}

impl From<AttributeInput> for SamplingInput {
    fn from(input: AttributeInput) -> Self {
        SamplingInput::Attribute(input)
    }
}

/// Collects missing fields while validating the present ones.
///
/// Negative values are invalid. Missing and zero values are recorded as
/// missing and read back as zero; the caller must check `missing()` before
/// using them.
#[derive(Debug, Default)]
pub(crate) struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A decimal that must be strictly positive
    pub(crate) fn positive(&mut self, field: &str, value: Option<Decimal>) -> CalcResult<Decimal> {
        match value {
            None => {
                self.missing.push(field.to_string());
                Ok(Decimal::ZERO)
            }
            Some(v) if v < Decimal::ZERO => {
                Err(CalcError::invalid(field, format!("{} is negative", v)))
            }
            Some(v) if v.is_zero() => {
                self.missing.push(field.to_string());
                Ok(Decimal::ZERO)
            }
            Some(v) => Ok(v),
        }
    }

    /// A decimal where zero is a legitimate value
    pub(crate) fn non_negative(
        &mut self,
        field: &str,
        value: Option<Decimal>,
    ) -> CalcResult<Decimal> {
        match value {
            None => {
                self.missing.push(field.to_string());
                Ok(Decimal::ZERO)
            }
            Some(v) if v < Decimal::ZERO => {
                Err(CalcError::invalid(field, format!("{} is negative", v)))
            }
            Some(v) => Ok(v),
        }
    }

    /// An item count that must be at least one
    pub(crate) fn count(&mut self, field: &str, value: Option<u64>) -> u64 {
        match value {
            None | Some(0) => {
                self.missing.push(field.to_string());
                0
            }
            Some(v) => v,
        }
    }

    /// Fields that were missing or zero, if any
    pub(crate) fn missing(&self) -> Option<&[String]> {
        if self.missing.is_empty() {
            None
        } else {
            Some(&self.missing)
        }
    }
}
