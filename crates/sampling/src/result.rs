//! Sampling results and their computation traces

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::input::SamplingMethod;

/// Whether the inputs were complete enough to compute a size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SamplingStatus {
    Complete,
    /// Required inputs were missing or zero; sample size is 0
    Incomplete { missing: Vec<String> },
}

/// MUS formula path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusTrace {
    pub confidence_level: u32,
    pub expected_misstatements: u32,
    pub reliability_factor: Decimal,
    /// The expected misstatement count was beyond the table
    pub factor_fallback: bool,
    /// floor(tolerable_error / reliability_factor)
    pub sampling_interval: Decimal,
    /// population_value / sampling_interval before rounding up
    pub raw_sample_size: Decimal,
}

/// Classical variables formula path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalTrace {
    pub confidence_level: u32,
    pub z_value: Decimal,
    pub assumed_std_dev: Decimal,
    /// z_value * assumed_std_dev / tolerable_error
    pub ratio: Decimal,
    /// ratio squared, before rounding up
    pub raw_sample_size: Decimal,
    /// ceil(raw_sample_size) before the population cap
    pub uncapped_sample_size: u64,
    pub capped: bool,
}

/// Attribute formula path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeTrace {
    pub confidence_level: u32,
    pub expected_error_rate: Decimal,
    /// expected_error_rate + 5 percentage points
    pub tolerable_rate: Decimal,
    pub reliability_factor: Decimal,
    pub raw_sample_size: Decimal,
    pub uncapped_sample_size: u64,
    pub capped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SamplingTrace {
    Mus(MusTrace),
    ClassicalVariables(ClassicalTrace),
    Attribute(AttributeTrace),
}

/// Sample size with the formula path that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingResult {
    pub method: SamplingMethod,
    pub sample_size: u64,
    pub status: SamplingStatus,
    /// Absent when the inputs were incomplete
    pub trace: Option<SamplingTrace>,
}

impl SamplingResult {
    pub fn complete(method: SamplingMethod, sample_size: u64, trace: SamplingTrace) -> Self {
        Self {
            method,
            sample_size,
            status: SamplingStatus::Complete,
            trace: Some(trace),
        }
    }

    pub fn incomplete(method: SamplingMethod, missing: &[String]) -> Self {
        Self {
            method,
            sample_size: 0,
            status: SamplingStatus::Incomplete {
                missing: missing.to_vec(),
            },
            trace: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == SamplingStatus::Complete
    }

    /// Fields that still need a value
    pub fn missing_fields(&self) -> &[String] {
        match &self.status {
            SamplingStatus::Complete => &[],
            SamplingStatus::Incomplete { missing } => missing,
        }
    }
}
