//! Materiality and ledger errors

use auditcalc_core::CalcError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from a version ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Version conflict for engagement {engagement_id}: expected current {expected}, found {actual}")]
    VersionConflict {
        engagement_id: String,
        expected: String,
        actual: String,
    },

    #[error("Version {got} out of sequence for engagement {engagement_id}, next is {next}")]
    OutOfSequence {
        engagement_id: String,
        next: u32,
        got: u32,
    },

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Version id {0} already exists")]
    DuplicateId(String),

    #[error("Version {version_id} is not current (current: {current})")]
    NotCurrent { version_id: String, current: String },

    #[error("Version {version_id} already approved by {approved_by} at {approved_at}")]
    AlreadyApproved {
        version_id: String,
        approved_by: String,
        approved_at: DateTime<Utc>,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt ledger record: {0}")]
    Corrupt(String),

    #[error("Ledger lock poisoned")]
    Poisoned,
}

impl LedgerError {
    pub(crate) fn conflict(
        engagement_id: &str,
        expected: Option<&str>,
        actual: Option<&str>,
    ) -> Self {
        Self::VersionConflict {
            engagement_id: engagement_id.to_string(),
            expected: expected.unwrap_or("<none>").to_string(),
            actual: actual.unwrap_or("<none>").to_string(),
        }
    }
}

/// Errors from materiality operations
#[derive(Debug, Error)]
pub enum MaterialityError {
    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("Version conflict for engagement {engagement_id}: expected current {expected}, found {actual}")]
    VersionConflict {
        engagement_id: String,
        expected: String,
        actual: String,
    },

    #[error("Version {version_id} is not the current version (current: {current})")]
    NotCurrentVersion { version_id: String, current: String },

    #[error("Version {version_id} already approved by {approved_by} at {approved_at}")]
    AlreadyApproved {
        version_id: String,
        approved_by: String,
        approved_at: DateTime<Utc>,
    },

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Ledger error: {0}")]
    Ledger(LedgerError),
}

impl From<LedgerError> for MaterialityError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::VersionConflict {
                engagement_id,
                expected,
                actual,
            } => MaterialityError::VersionConflict {
                engagement_id,
                expected,
                actual,
            },
            LedgerError::NotCurrent { version_id, current } => {
                MaterialityError::NotCurrentVersion { version_id, current }
            }
            LedgerError::AlreadyApproved {
                version_id,
                approved_by,
                approved_at,
            } => MaterialityError::AlreadyApproved {
                version_id,
                approved_by,
                approved_at,
            },
            LedgerError::VersionNotFound(id) => MaterialityError::VersionNotFound(id),
            other => MaterialityError::Ledger(other),
        }
    }
}

impl MaterialityError {
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, MaterialityError::VersionConflict { .. })
    }
}
