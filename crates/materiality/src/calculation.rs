//! Materiality data structures

use auditcalc_core::{BenchmarkType, Percentage, RiskLevel};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::calculator::{Advisory, MaterialityResult};

/// Documented professional judgement behind each input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rationale {
    #[serde(default)]
    pub benchmark: Option<String>,
    #[serde(default)]
    pub overall: Option<String>,
    #[serde(default)]
    pub performance: Option<String>,
    #[serde(default)]
    pub trivial: Option<String>,
}

/// Everything the auditor enters for a materiality calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialityInputs {
    pub benchmark_type: BenchmarkType,
    pub benchmark_value: Decimal,
    /// % of benchmark value
    pub overall_pct: Percentage,
    /// % of overall materiality
    pub performance_pct: Percentage,
    /// % of overall materiality
    pub trivial_pct: Percentage,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub rationale: Rationale,
}

impl MaterialityInputs {
    pub fn new(
        benchmark_type: BenchmarkType,
        benchmark_value: Decimal,
        overall_pct: Percentage,
        performance_pct: Percentage,
        trivial_pct: Percentage,
    ) -> Self {
        Self {
            benchmark_type,
            benchmark_value,
            overall_pct,
            performance_pct,
            trivial_pct,
            industry: None,
            risk_level: RiskLevel::default(),
            rationale: Rationale::default(),
        }
    }

    /// SHA256 of the canonical JSON form.
    ///
    /// Decimals are normalized first so `5` and `5.00` hash the same.
    pub fn fingerprint(&self) -> String {
        let mut canonical = self.clone();
        canonical.benchmark_value = canonical.benchmark_value.normalize();
        canonical.overall_pct =
            Percentage::new_unchecked(canonical.overall_pct.value().normalize());
        canonical.performance_pct =
            Percentage::new_unchecked(canonical.performance_pct.value().normalize());
        canonical.trivial_pct =
            Percentage::new_unchecked(canonical.trivial_pct.value().normalize());

        // A struct of plain fields always serializes
        let json = serde_json::to_string(&canonical).unwrap_or_default();
        compute_hash(&json)
    }
}

/// Derived threshold amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialityThresholds {
    pub overall: Decimal,
    pub performance: Decimal,
    pub clearly_trivial: Decimal,
}

impl MaterialityThresholds {
    pub const ZERO: Self = Self {
        overall: Decimal::ZERO,
        performance: Decimal::ZERO,
        clearly_trivial: Decimal::ZERO,
    };
}

/// One saved version of an engagement's materiality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialityCalculation {
    /// Unique identifier for this version
    pub id: String,

    pub engagement_id: String,

    /// 1-based, increases by exactly one per save
    pub version: u32,

    pub inputs: MaterialityInputs,

    pub thresholds: MaterialityThresholds,

    /// Advisory flags raised when the version was computed
    pub advisories: Vec<Advisory>,

    /// Fingerprint of `inputs`, used to detect unchanged saves
    pub inputs_hash: String,

    /// Exactly one version per engagement is current
    pub is_current: bool,

    pub created_at: DateTime<Utc>,
    pub created_by: String,

    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

impl MaterialityCalculation {
    /// Build a new current version from computed inputs
    pub fn new_version(
        engagement_id: &str,
        version: u32,
        inputs: MaterialityInputs,
        result: MaterialityResult,
        created_by: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        let id = format!("MAT-{}", uuid::Uuid::new_v4().simple().to_string().to_uppercase());
        let inputs_hash = inputs.fingerprint();

        Self {
            id,
            engagement_id: engagement_id.to_string(),
            version,
            inputs,
            thresholds: result.thresholds,
            advisories: result.advisories,
            inputs_hash,
            is_current: true,
            created_at,
            created_by: created_by.to_string(),
            approved_at: None,
            approved_by: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }

    /// False when an advisory marks the thresholds as not approvable
    pub fn is_approvable(&self) -> bool {
        !self.advisories.iter().any(Advisory::blocks_approval)
    }
}

/// Compute SHA256 hash of a string
fn compute_hash(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}
