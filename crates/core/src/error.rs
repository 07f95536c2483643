//! Calculation errors
//!
//! Incomplete input is not an error: calculators resolve it to a zero result.
//! Only invalid input and arithmetic degeneracy are reported here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Degenerate computation: {0}")]
    DegenerateComputation(String),
}

/// Result type alias for pure computations
pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    /// Create an invalid input error
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a degenerate computation error
    pub fn degenerate(what: impl Into<String>) -> Self {
        Self::DegenerateComputation(what.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. })
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, CalcError::DegenerateComputation(_))
    }
}
