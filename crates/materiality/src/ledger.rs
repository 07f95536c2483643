//! Version ledger contract and in-memory implementation

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::calculation::MaterialityCalculation;
use crate::error::LedgerError;

/// Storage for materiality versions.
///
/// `append` and `mark_approved` are compare-and-swap operations: each
/// implementation must check its preconditions and write in one atomic step.
pub trait VersionLedger: Send + Sync {
    /// Append a new current version.
    ///
    /// Fails with `VersionConflict` unless `expected_current` is the id of the
    /// engagement's current version (or `None` when it has none). The new
    /// version number must be one more than the highest stored.
    fn append(
        &self,
        expected_current: Option<&str>,
        calc: MaterialityCalculation,
    ) -> Result<MaterialityCalculation, LedgerError>;

    fn get(&self, version_id: &str) -> Result<Option<MaterialityCalculation>, LedgerError>;

    fn get_current(
        &self,
        engagement_id: &str,
    ) -> Result<Option<MaterialityCalculation>, LedgerError>;

    /// All versions for an engagement, oldest first
    fn get_history(&self, engagement_id: &str) -> Result<Vec<MaterialityCalculation>, LedgerError>;

    /// Approve the current, unapproved version
    fn mark_approved(
        &self,
        version_id: &str,
        approver: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<MaterialityCalculation, LedgerError>;
}

impl<L: VersionLedger + ?Sized> VersionLedger for Arc<L> {
    fn append(
        &self,
        expected_current: Option<&str>,
        calc: MaterialityCalculation,
    ) -> Result<MaterialityCalculation, LedgerError> {
        (**self).append(expected_current, calc)
    }

    fn get(&self, version_id: &str) -> Result<Option<MaterialityCalculation>, LedgerError> {
        (**self).get(version_id)
    }

    fn get_current(
        &self,
        engagement_id: &str,
    ) -> Result<Option<MaterialityCalculation>, LedgerError> {
        (**self).get_current(engagement_id)
    }

    fn get_history(&self, engagement_id: &str) -> Result<Vec<MaterialityCalculation>, LedgerError> {
        (**self).get_history(engagement_id)
    }

    fn mark_approved(
        &self,
        version_id: &str,
        approver: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<MaterialityCalculation, LedgerError> {
        (**self).mark_approved(version_id, approver, approved_at)
    }
}

/// Check append preconditions against the ledger's state at commit time
pub(crate) fn check_append(
    calc: &MaterialityCalculation,
    expected_current: Option<&str>,
    actual_current: Option<&str>,
    highest_version: u32,
    id_taken: bool,
) -> Result<(), LedgerError> {
    if expected_current != actual_current {
        return Err(LedgerError::conflict(
            &calc.engagement_id,
            expected_current,
            actual_current,
        ));
    }

    let next = highest_version + 1;
    if calc.version != next {
        return Err(LedgerError::OutOfSequence {
            engagement_id: calc.engagement_id.clone(),
            next,
            got: calc.version,
        });
    }

    if id_taken {
        return Err(LedgerError::DuplicateId(calc.id.clone()));
    }

    Ok(())
}

/// Check approval preconditions for a stored version
pub(crate) fn check_approval(
    calc: &MaterialityCalculation,
    current_id: Option<&str>,
) -> Result<(), LedgerError> {
    if !calc.is_current || current_id != Some(calc.id.as_str()) {
        return Err(LedgerError::NotCurrent {
            version_id: calc.id.clone(),
            current: current_id.unwrap_or("<none>").to_string(),
        });
    }

    if let (Some(approved_at), Some(approved_by)) = (calc.approved_at, calc.approved_by.as_ref()) {
        return Err(LedgerError::AlreadyApproved {
            version_id: calc.id.clone(),
            approved_by: approved_by.clone(),
            approved_at,
        });
    }

    Ok(())
}

/// Ledger held in process memory
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    versions: Mutex<Vec<MaterialityCalculation>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total versions across all engagements
    pub fn len(&self) -> usize {
        self.versions.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VersionLedger for InMemoryLedger {
    fn append(
        &self,
        expected_current: Option<&str>,
        mut calc: MaterialityCalculation,
    ) -> Result<MaterialityCalculation, LedgerError> {
        let mut versions = self.versions.lock().map_err(|_| LedgerError::Poisoned)?;

        let engagement_id = calc.engagement_id.clone();
        let actual_current = versions
            .iter()
            .find(|v| v.engagement_id == engagement_id && v.is_current)
            .map(|v| v.id.clone());
        let highest = versions
            .iter()
            .filter(|v| v.engagement_id == engagement_id)
            .map(|v| v.version)
            .max()
            .unwrap_or(0);
        let id_taken = versions.iter().any(|v| v.id == calc.id);

        check_append(
            &calc,
            expected_current,
            actual_current.as_deref(),
            highest,
            id_taken,
        )?;

        for v in versions.iter_mut().filter(|v| v.engagement_id == engagement_id) {
            v.is_current = false;
        }

        calc.is_current = true;
        versions.push(calc.clone());
        Ok(calc)
    }

    fn get(&self, version_id: &str) -> Result<Option<MaterialityCalculation>, LedgerError> {
        let versions = self.versions.lock().map_err(|_| LedgerError::Poisoned)?;
        Ok(versions.iter().find(|v| v.id == version_id).cloned())
    }

    fn get_current(
        &self,
        engagement_id: &str,
    ) -> Result<Option<MaterialityCalculation>, LedgerError> {
        let versions = self.versions.lock().map_err(|_| LedgerError::Poisoned)?;
        Ok(versions
            .iter()
            .find(|v| v.engagement_id == engagement_id && v.is_current)
            .cloned())
    }

    fn get_history(&self, engagement_id: &str) -> Result<Vec<MaterialityCalculation>, LedgerError> {
        let versions = self.versions.lock().map_err(|_| LedgerError::Poisoned)?;
        let mut history: Vec<MaterialityCalculation> = versions
            .iter()
            .filter(|v| v.engagement_id == engagement_id)
            .cloned()
            .collect();
        history.sort_by_key(|v| v.version);
        Ok(history)
    }

    fn mark_approved(
        &self,
        version_id: &str,
        approver: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<MaterialityCalculation, LedgerError> {
        let mut versions = self.versions.lock().map_err(|_| LedgerError::Poisoned)?;

        let engagement_id = versions
            .iter()
            .find(|v| v.id == version_id)
            .map(|v| v.engagement_id.clone())
            .ok_or_else(|| LedgerError::VersionNotFound(version_id.to_string()))?;
        let current_id = versions
            .iter()
            .find(|v| v.engagement_id == engagement_id && v.is_current)
            .map(|v| v.id.clone());

        let calc = versions
            .iter_mut()
            .find(|v| v.id == version_id)
            .ok_or_else(|| LedgerError::VersionNotFound(version_id.to_string()))?;

        check_approval(calc, current_id.as_deref())?;

        calc.approved_at = Some(approved_at);
        calc.approved_by = Some(approver.to_string());
        Ok(calc.clone())
    }
}
