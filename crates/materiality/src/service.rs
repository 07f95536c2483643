//! Save and approval workflow over a version ledger

use auditcalc_core::{CalcError, CalcResult};
use chrono::{DateTime, Utc};

use crate::calculation::{MaterialityCalculation, MaterialityInputs};
use crate::calculator::{MaterialityEngine, MaterialityResult};
use crate::config::AdvisoryRanges;
use crate::error::{LedgerError, MaterialityError};
use crate::ledger::VersionLedger;

/// What a save did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new current version was appended
    Created(MaterialityCalculation),
    /// Inputs matched the unapproved current version; nothing was written
    Unchanged(MaterialityCalculation),
}

impl SaveOutcome {
    pub fn version(&self) -> &MaterialityCalculation {
        match self {
            SaveOutcome::Created(calc) | SaveOutcome::Unchanged(calc) => calc,
        }
    }

    pub fn into_version(self) -> MaterialityCalculation {
        match self {
            SaveOutcome::Created(calc) | SaveOutcome::Unchanged(calc) => calc,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, SaveOutcome::Created(_))
    }
}

/// Materiality workflow: compute, save with optimistic concurrency, approve
pub struct MaterialityService<L: VersionLedger> {
    ledger: L,
    engine: MaterialityEngine,
}

impl<L: VersionLedger> MaterialityService<L> {
    pub fn new(ledger: L, ranges: AdvisoryRanges) -> Self {
        Self {
            ledger,
            engine: MaterialityEngine::new(ranges),
        }
    }

    /// Service with default advisory ranges
    pub fn with_ledger(ledger: L) -> Self {
        Self::new(ledger, AdvisoryRanges::default())
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn engine(&self) -> &MaterialityEngine {
        &self.engine
    }

    /// Compute without saving
    pub fn compute(&self, inputs: &MaterialityInputs) -> CalcResult<MaterialityResult> {
        self.engine.compute(inputs)
    }

    /// Save inputs as the engagement's current version.
    ///
    /// `expected_current` is the current version id the caller last saw
    /// (`None` for a first save). A stale id fails with `VersionConflict`.
    pub fn save(
        &self,
        engagement_id: &str,
        expected_current: Option<&str>,
        inputs: MaterialityInputs,
        author: &str,
    ) -> Result<SaveOutcome, MaterialityError> {
        require_non_empty("engagement_id", engagement_id)?;
        require_non_empty("author", author)?;

        let result = self.engine.compute(&inputs)?;
        let current = self.ledger.get_current(engagement_id)?;
        let current_id = current.as_ref().map(|c| c.id.as_str());

        if expected_current != current_id {
            tracing::warn!(
                engagement_id = %engagement_id,
                expected = expected_current.unwrap_or("<none>"),
                actual = current_id.unwrap_or("<none>"),
                "Stale materiality save rejected"
            );
            return Err(LedgerError::conflict(engagement_id, expected_current, current_id).into());
        }

        if let Some(current) = &current {
            if !current.is_approved() && current.inputs_hash == inputs.fingerprint() {
                tracing::debug!(
                    engagement_id = %engagement_id,
                    version = current.version,
                    "Inputs unchanged, keeping current version"
                );
                return Ok(SaveOutcome::Unchanged(current.clone()));
            }
        }

        let next = current.as_ref().map_or(1, |c| c.version + 1);
        for advisory in &result.advisories {
            tracing::warn!(
                engagement_id = %engagement_id,
                advisory = %advisory,
                "Materiality advisory"
            );
        }

        let calc = MaterialityCalculation::new_version(
            engagement_id,
            next,
            inputs,
            result,
            author,
            Utc::now(),
        );

        let saved = self.ledger.append(expected_current, calc).map_err(|e| {
            if matches!(e, LedgerError::VersionConflict { .. }) {
                tracing::warn!(
                    engagement_id = %engagement_id,
                    error = %e,
                    "Concurrent materiality save lost"
                );
            }
            MaterialityError::from(e)
        })?;

        tracing::info!(
            engagement_id = %engagement_id,
            version_id = %saved.id,
            version = saved.version,
            overall = %saved.thresholds.overall,
            "Materiality version created"
        );

        Ok(SaveOutcome::Created(saved))
    }

    /// Approve a specific version. Thresholds are not recomputed.
    pub fn approve(
        &self,
        version_id: &str,
        approver: &str,
        at: DateTime<Utc>,
    ) -> Result<MaterialityCalculation, MaterialityError> {
        require_non_empty("approver", approver)?;

        let approved = self.ledger.mark_approved(version_id, approver, at)?;
        if !approved.is_approvable() {
            tracing::warn!(
                version_id = %approved.id,
                "Approved a version flagged as not approvable"
            );
        }

        tracing::info!(
            engagement_id = %approved.engagement_id,
            version_id = %approved.id,
            approver = %approver,
            "Materiality version approved"
        );
        Ok(approved)
    }

    pub fn current(
        &self,
        engagement_id: &str,
    ) -> Result<Option<MaterialityCalculation>, MaterialityError> {
        Ok(self.ledger.get_current(engagement_id)?)
    }

    pub fn history(
        &self,
        engagement_id: &str,
    ) -> Result<Vec<MaterialityCalculation>, MaterialityError> {
        Ok(self.ledger.get_history(engagement_id)?)
    }

    pub fn get(&self, version_id: &str) -> Result<MaterialityCalculation, MaterialityError> {
        self.ledger
            .get(version_id)?
            .ok_or_else(|| MaterialityError::VersionNotFound(version_id.to_string()))
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), CalcError> {
    if value.trim().is_empty() {
        return Err(CalcError::invalid(field, "must not be empty"));
    }
    Ok(())
}
