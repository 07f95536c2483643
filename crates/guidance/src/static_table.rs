//! Static guidance table
//!
//! Ships a default set of entries and accepts additional ones at runtime or
//! from a JSON file.

use async_trait::async_trait;
use auditcalc_core::{BenchmarkType, Percentage};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use crate::error::GuidanceError;
use crate::types::{normalize_industry, GuidanceRecommendation, IndustryGuidance, GENERAL_INDUSTRY};

/// In-memory guidance keyed by (industry, benchmark)
pub struct StaticGuidance {
    entries: RwLock<HashMap<(String, BenchmarkType), GuidanceRecommendation>>,
}

/// (industry, benchmark, overall %, performance %, trivial %, rationale)
type DefaultEntry = (&'static str, BenchmarkType, (i64, u32), i64, i64, &'static str);

const DEFAULT_ENTRIES: &[DefaultEntry] = &[
    (
        GENERAL_INDUSTRY,
        BenchmarkType::Revenue,
        (10, 1),
        75,
        5,
        "Revenue is a stable benchmark for entities with volatile earnings.",
    ),
    (
        GENERAL_INDUSTRY,
        BenchmarkType::TotalAssets,
        (10, 1),
        75,
        5,
        "Total assets suit asset-intensive entities.",
    ),
    (
        GENERAL_INDUSTRY,
        BenchmarkType::NetIncome,
        (50, 1),
        75,
        5,
        "Pre-tax income is the primary focus of users for profit-oriented entities.",
    ),
    (
        GENERAL_INDUSTRY,
        BenchmarkType::Equity,
        (20, 1),
        75,
        5,
        "Equity suits entities whose users focus on net assets.",
    ),
    (
        GENERAL_INDUSTRY,
        BenchmarkType::Expenses,
        (10, 1),
        75,
        5,
        "Expenses suit entities whose users focus on cost of services.",
    ),
    (
        "manufacturing",
        BenchmarkType::Revenue,
        (10, 1),
        75,
        5,
        "Manufacturers with thin or volatile margins are commonly benchmarked on revenue.",
    ),
    (
        "manufacturing",
        BenchmarkType::NetIncome,
        (50, 1),
        65,
        5,
        "Stable profitable manufacturers; lower performance materiality for inventory complexity.",
    ),
    (
        "retail",
        BenchmarkType::Revenue,
        (5, 1),
        75,
        5,
        "High-volume, low-margin retailers use a low percentage of revenue.",
    ),
    (
        "retail",
        BenchmarkType::NetIncome,
        (50, 1),
        75,
        5,
        "Profitable retailers with consistent earnings.",
    ),
    (
        "nonprofit",
        BenchmarkType::Expenses,
        (20, 1),
        75,
        5,
        "Not-for-profit users focus on how resources are spent.",
    ),
    (
        "nonprofit",
        BenchmarkType::TotalAssets,
        (10, 1),
        75,
        5,
        "Endowment-heavy organizations with significant net assets.",
    ),
    (
        "financial_services",
        BenchmarkType::TotalAssets,
        (5, 1),
        60,
        3,
        "Balance-sheet driven entities; regulatory scrutiny supports a lower threshold.",
    ),
    (
        "financial_services",
        BenchmarkType::Equity,
        (10, 1),
        60,
        3,
        "Capital adequacy is the key measure for regulated financial institutions.",
    ),
    (
        "government",
        BenchmarkType::Expenses,
        (10, 1),
        50,
        3,
        "Public accountability warrants conservative thresholds on expenditures.",
    ),
];

impl StaticGuidance {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a table with the built-in entries
    pub fn with_defaults() -> Self {
        let guidance = Self::new();

        for &(industry, benchmark, (mantissa, scale), performance, trivial, rationale) in
            DEFAULT_ENTRIES
        {
            let recommendation = GuidanceRecommendation {
                industry: industry.to_string(),
                benchmark_type: benchmark,
                recommended_overall_pct: Percentage::new_unchecked(Decimal::new(mantissa, scale)),
                recommended_performance_pct: Percentage::new_unchecked(Decimal::from(performance)),
                recommended_trivial_pct: Percentage::new_unchecked(Decimal::from(trivial)),
                rationale: rationale.to_string(),
            };
            guidance.insert(recommendation);
        }

        guidance
    }

    /// Load extra entries from a JSON array of recommendations, on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self, GuidanceError> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<GuidanceRecommendation> = serde_json::from_str(&content)?;

        let guidance = Self::with_defaults();
        for entry in entries {
            if entry.recommended_overall_pct.is_zero() {
                return Err(GuidanceError::InvalidEntry {
                    industry: entry.industry,
                    reason: "recommended overall percentage is zero".to_string(),
                });
            }
            guidance.insert(entry);
        }

        Ok(guidance)
    }

    /// Add or replace an entry
    pub fn insert(&self, mut recommendation: GuidanceRecommendation) {
        recommendation.industry = normalize_industry(&recommendation.industry);
        let key = (recommendation.industry.clone(), recommendation.benchmark_type);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, recommendation);
    }

    /// Remove an entry
    pub fn remove(&self, industry: &str, benchmark_type: BenchmarkType) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&(normalize_industry(industry), benchmark_type));
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for StaticGuidance {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl IndustryGuidance for StaticGuidance {
    async fn lookup(
        &self,
        industry: &str,
        benchmark_type: BenchmarkType,
    ) -> Result<GuidanceRecommendation, GuidanceError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&(normalize_industry(industry), benchmark_type))
            .cloned()
            .ok_or_else(|| GuidanceError::NotFound {
                industry: industry.to_string(),
                benchmark: benchmark_type.to_string(),
            })
    }

    async fn supported_industries(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut industries: Vec<String> = entries.keys().map(|(i, _)| i.clone()).collect();
        industries.sort();
        industries.dedup();
        industries
    }
}
