//! ConfidenceLevel - The assurance levels supported by the sampling tables
//!
//! Only 90%, 95% and 99% have reliability factors and z-values defined.
//! Any other level is rejected at construction.

use crate::error::CalcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confidence level for a sampling computation.
///
/// # Examples
/// ```
/// use auditcalc_core::ConfidenceLevel;
///
/// let cl = ConfidenceLevel::try_from(95).unwrap();
/// assert_eq!(cl, ConfidenceLevel::NinetyFive);
/// assert_eq!(cl.to_string(), "95%");
///
/// // Levels outside the table are rejected
/// assert!(ConfidenceLevel::try_from(80).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ConfidenceLevel {
    /// 90% confidence
    Ninety,
    /// 95% confidence (the usual default)
    NinetyFive,
    /// 99% confidence
    NinetyNine,
}

impl ConfidenceLevel {
    /// All supported levels, ascending
    pub const ALL: [ConfidenceLevel; 3] = [
        ConfidenceLevel::Ninety,
        ConfidenceLevel::NinetyFive,
        ConfidenceLevel::NinetyNine,
    ];

    /// The level as a whole percentage (90, 95 or 99)
    pub fn percent(&self) -> u32 {
        match self {
            ConfidenceLevel::Ninety => 90,
            ConfidenceLevel::NinetyFive => 95,
            ConfidenceLevel::NinetyNine => 99,
        }
    }

    /// Row index into the reliability factor table
    pub fn index(&self) -> usize {
        match self {
            ConfidenceLevel::Ninety => 0,
            ConfidenceLevel::NinetyFive => 1,
            ConfidenceLevel::NinetyNine => 2,
        }
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        ConfidenceLevel::NinetyFive
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl TryFrom<u32> for ConfidenceLevel {
    type Error = CalcError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            90 => Ok(ConfidenceLevel::Ninety),
            95 => Ok(ConfidenceLevel::NinetyFive),
            99 => Ok(ConfidenceLevel::NinetyNine),
            other => Err(CalcError::invalid(
                "confidence_level",
                format!("{} is not one of 90, 95, 99", other),
            )),
        }
    }
}

impl From<ConfidenceLevel> for u32 {
    fn from(cl: ConfidenceLevel) -> Self {
        cl.percent()
    }
}

impl FromStr for ConfidenceLevel {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%').trim();
        let value: u32 = trimmed.parse().map_err(|_| {
            CalcError::invalid("confidence_level", format!("'{}' is not a number", s))
        })?;
        Self::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_supported_levels() {
        assert_eq!(ConfidenceLevel::try_from(90).unwrap(), ConfidenceLevel::Ninety);
        assert_eq!(ConfidenceLevel::try_from(95).unwrap(), ConfidenceLevel::NinetyFive);
        assert_eq!(ConfidenceLevel::try_from(99).unwrap(), ConfidenceLevel::NinetyNine);
    }

    #[test]
    fn test_unsupported_level_is_invalid_input() {
        for level in [0, 50, 80, 91, 100] {
            let err = ConfidenceLevel::try_from(level).unwrap_err();
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn test_parse_with_percent_sign() {
        assert_eq!("95%".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::NinetyFive);
        assert_eq!(" 99 ".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::NinetyNine);
        assert!("ninety".parse::<ConfidenceLevel>().is_err());
    }

    #[test]
    fn test_default_is_95() {
        assert_eq!(ConfidenceLevel::default().percent(), 95);
    }

    #[test]
    fn test_serde_as_integer() {
        let json = serde_json::to_string(&ConfidenceLevel::Ninety).unwrap();
        assert_eq!(json, "90");

        let parsed: ConfidenceLevel = serde_json::from_str("99").unwrap();
        assert_eq!(parsed, ConfidenceLevel::NinetyNine);

        assert!(serde_json::from_str::<ConfidenceLevel>("85").is_err());
    }
}
