//! Core guidance types

use async_trait::async_trait;
use auditcalc_core::{BenchmarkType, Percentage};
use serde::{Deserialize, Serialize};

use crate::GuidanceError;

/// Industry key used when a specific industry has no entry
pub const GENERAL_INDUSTRY: &str = "general";

/// Normalize an industry name into a lookup key ("Financial Services" -> "financial_services")
pub fn normalize_industry(industry: &str) -> String {
    industry
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Recommended percentages for one industry and benchmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceRecommendation {
    pub industry: String,
    pub benchmark_type: BenchmarkType,
    /// Percentage of the benchmark value
    pub recommended_overall_pct: Percentage,
    /// Percentage of overall materiality
    pub recommended_performance_pct: Percentage,
    /// Percentage of overall materiality
    pub recommended_trivial_pct: Percentage,
    pub rationale: String,
}

/// Industry guidance provider
///
/// Implementations can be:
/// - StaticGuidance: Built-in table, optionally extended from a JSON file
/// - A firm methodology service
#[async_trait]
pub trait IndustryGuidance: Send + Sync {
    /// Get the recommendation for an industry and benchmark
    async fn lookup(
        &self,
        industry: &str,
        benchmark_type: BenchmarkType,
    ) -> Result<GuidanceRecommendation, GuidanceError>;

    /// Industries with at least one entry
    async fn supported_industries(&self) -> Vec<String>;

    /// Look up the industry, falling back to the general entry for the benchmark
    async fn lookup_or_general(
        &self,
        industry: &str,
        benchmark_type: BenchmarkType,
    ) -> Result<GuidanceRecommendation, GuidanceError> {
        match self.lookup(industry, benchmark_type).await {
            Err(GuidanceError::NotFound { .. }) => {
                self.lookup(GENERAL_INDUSTRY, benchmark_type).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_industry() {
        assert_eq!(normalize_industry("Financial Services"), "financial_services");
        assert_eq!(normalize_industry("  not-for-profit "), "not_for_profit");
        assert_eq!(normalize_industry("RETAIL"), "retail");
    }
}
