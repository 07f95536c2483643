//! Guidance error types

use thiserror::Error;

/// Guidance lookup errors
#[derive(Debug, Error)]
pub enum GuidanceError {
    /// No recommendation for this industry / benchmark pair
    #[error("No guidance for industry '{industry}' and benchmark '{benchmark}'")]
    NotFound { industry: String, benchmark: String },

    /// A recommendation failed validation when loaded
    #[error("Invalid guidance entry for '{industry}': {reason}")]
    InvalidEntry { industry: String, reason: String },

    /// Guidance file could not be parsed
    #[error("Guidance parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Guidance IO error: {0}")]
    Io(#[from] std::io::Error),
}
