//! Materiality configuration with configurable advisory ranges
//!
//! The ranges only drive advisory flags. Percentages outside them are still
//! computed and saved.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Conventional percentage ranges used for advisory flags (inclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRanges {
    /// Overall materiality as % of benchmark
    #[serde(default = "default_overall_min")]
    pub overall_min: Decimal,
    #[serde(default = "default_overall_max")]
    pub overall_max: Decimal,

    /// Performance materiality as % of overall
    #[serde(default = "default_performance_min")]
    pub performance_min: Decimal,
    #[serde(default = "default_performance_max")]
    pub performance_max: Decimal,

    /// Clearly trivial threshold as % of overall
    #[serde(default = "default_trivial_min")]
    pub trivial_min: Decimal,
    #[serde(default = "default_trivial_max")]
    pub trivial_max: Decimal,
}

// Default value functions for serde
fn default_overall_min() -> Decimal {
    Decimal::new(5, 1) // 0.5%
}

fn default_overall_max() -> Decimal {
    Decimal::new(5, 0)
}

fn default_performance_min() -> Decimal {
    Decimal::new(50, 0)
}

fn default_performance_max() -> Decimal {
    Decimal::new(75, 0)
}

fn default_trivial_min() -> Decimal {
    Decimal::new(3, 0)
}

fn default_trivial_max() -> Decimal {
    Decimal::new(5, 0)
}

impl Default for AdvisoryRanges {
    fn default() -> Self {
        Self {
            overall_min: default_overall_min(),
            overall_max: default_overall_max(),
            performance_min: default_performance_min(),
            performance_max: default_performance_max(),
            trivial_min: default_trivial_min(),
            trivial_max: default_trivial_max(),
        }
    }
}

/// Top-level configuration, loadable from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialityConfig {
    #[serde(default)]
    pub advisory: AdvisoryRanges,

    /// SQLite ledger location
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Extra guidance entries (JSON array), merged over the built-in table
    #[serde(default)]
    pub guidance_path: Option<PathBuf>,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("./data/materiality.db")
}

impl Default for MaterialityConfig {
    fn default() -> Self {
        Self {
            advisory: AdvisoryRanges::default(),
            ledger_path: default_ledger_path(),
            guidance_path: None,
        }
    }
}

impl MaterialityConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_default_ranges() {
        let ranges = AdvisoryRanges::default();

        assert_eq!(ranges.overall_min, dec!(0.5));
        assert_eq!(ranges.overall_max, dec!(5));
        assert_eq!(ranges.performance_min, dec!(50));
        assert_eq!(ranges.performance_max, dec!(75));
        assert_eq!(ranges.trivial_min, dec!(3));
        assert_eq!(ranges.trivial_max, dec!(5));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{"advisory": {"overall_max": "10"}}"#;
        let config: MaterialityConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.advisory.overall_max, dec!(10));
        assert_eq!(config.advisory.overall_min, dec!(0.5));
        assert_eq!(config.ledger_path, PathBuf::from("./data/materiality.db"));
        assert!(config.guidance_path.is_none());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ledger_path": "/tmp/ledger.db"}}"#).unwrap();

        let config = MaterialityConfig::from_file(file.path()).unwrap();
        assert_eq!(config.ledger_path, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.advisory, AdvisoryRanges::default());
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = MaterialityConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
