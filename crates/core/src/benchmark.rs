//! Materiality classification enums

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Financial-statement benchmark that overall materiality is based on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkType {
    /// Total revenue
    Revenue,
    /// Total assets
    TotalAssets,
    /// Net income (usually pre-tax income from continuing operations)
    NetIncome,
    /// Shareholders' equity / net assets
    Equity,
    /// Total expenses (common for not-for-profit and government entities)
    Expenses,
}

impl BenchmarkType {
    pub const ALL: [BenchmarkType; 5] = [
        BenchmarkType::Revenue,
        BenchmarkType::TotalAssets,
        BenchmarkType::NetIncome,
        BenchmarkType::Equity,
        BenchmarkType::Expenses,
    ];

    /// Human readable label for documentation output
    pub fn label(&self) -> &'static str {
        match self {
            BenchmarkType::Revenue => "Total Revenue",
            BenchmarkType::TotalAssets => "Total Assets",
            BenchmarkType::NetIncome => "Net Income",
            BenchmarkType::Equity => "Total Equity",
            BenchmarkType::Expenses => "Total Expenses",
        }
    }
}

/// Assessed engagement risk, recorded alongside a materiality version
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    #[default]
    Moderate,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_parse_snake_case() {
        assert_eq!("revenue".parse::<BenchmarkType>().unwrap(), BenchmarkType::Revenue);
        assert_eq!(
            "total_assets".parse::<BenchmarkType>().unwrap(),
            BenchmarkType::TotalAssets
        );
        assert_eq!(
            "net_income".parse::<BenchmarkType>().unwrap(),
            BenchmarkType::NetIncome
        );
        assert!("gross_margin".parse::<BenchmarkType>().is_err());
    }

    #[test]
    fn test_benchmark_display_matches_serde() {
        for benchmark in BenchmarkType::ALL {
            let json = serde_json::to_string(&benchmark).unwrap();
            assert_eq!(json, format!("\"{}\"", benchmark));
        }
    }

    #[test]
    fn test_risk_level_default() {
        assert_eq!(RiskLevel::default(), RiskLevel::Moderate);
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!(RiskLevel::Low.to_string(), "low");
    }
}
