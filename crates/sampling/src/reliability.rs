//! Reliability factors for zero to three expected errors
//!
//! Poisson-based factors indexed by confidence level and expected error count.
//! There is no interpolation; counts above the table use a flat fallback.

use auditcalc_core::ConfidenceLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Factor with two decimal places, e.g. `hundredths(231)` = 2.31
const fn hundredths(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 2)
}

/// Highest expected error count with a tabulated factor
pub const MAX_TABULATED_ERRORS: u32 = 3;

/// Factor used when expected errors exceed the table (3.0)
pub const FALLBACK_FACTOR: Decimal = hundredths(300);

/// Rows: 90%, 95%, 99%. Columns: 0, 1, 2, 3 expected errors.
const STANDARD_FACTORS: [[Decimal; 4]; 3] = [
    [hundredths(231), hundredths(389), hundredths(533), hundredths(669)],
    [hundredths(300), hundredths(475), hundredths(630), hundredths(776)],
    [hundredths(461), hundredths(664), hundredths(841), hundredths(1005)],
];

/// Result of a table lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliabilityLookup {
    pub factor: Decimal,
    /// True when the expected error count was beyond the table and the
    /// flat fallback factor was used
    pub fallback: bool,
}

/// Confidence level x expected errors -> reliability factor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReliabilityFactorTable {
    factors: [[Decimal; 4]; 3],
}

impl ReliabilityFactorTable {
    /// The standard AU-C 530 table
    pub const fn standard() -> Self {
        Self {
            factors: STANDARD_FACTORS,
        }
    }

    /// Look up the factor for a confidence level and expected error count.
    ///
    /// Counts above 3 return the 3.0 fallback, not an extrapolated value.
    pub fn lookup(&self, confidence: ConfidenceLevel, expected_errors: u32) -> ReliabilityLookup {
        if expected_errors > MAX_TABULATED_ERRORS {
            return ReliabilityLookup {
                factor: FALLBACK_FACTOR,
                fallback: true,
            };
        }

        ReliabilityLookup {
            factor: self.factors[confidence.index()][expected_errors as usize],
            fallback: false,
        }
    }

    /// Convenience: factor only
    pub fn factor(&self, confidence: ConfidenceLevel, expected_errors: u32) -> Decimal {
        self.lookup(confidence, expected_errors).factor
    }

    /// One row of the table (for display)
    pub fn row(&self, confidence: ConfidenceLevel) -> &[Decimal; 4] {
        &self.factors[confidence.index()]
    }
}

impl Default for ReliabilityFactorTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_standard_table_values() {
        let table = ReliabilityFactorTable::standard();

        assert_eq!(
            table.row(ConfidenceLevel::Ninety),
            &[dec!(2.31), dec!(3.89), dec!(5.33), dec!(6.69)]
        );
        assert_eq!(
            table.row(ConfidenceLevel::NinetyFive),
            &[dec!(3.00), dec!(4.75), dec!(6.30), dec!(7.76)]
        );
        assert_eq!(
            table.row(ConfidenceLevel::NinetyNine),
            &[dec!(4.61), dec!(6.64), dec!(8.41), dec!(10.05)]
        );
    }

    #[test]
    fn test_lookup_within_table() {
        let table = ReliabilityFactorTable::standard();
        let lookup = table.lookup(ConfidenceLevel::NinetyFive, 0);
        assert_eq!(lookup.factor, dec!(3.00));
        assert!(!lookup.fallback);

        assert_eq!(table.factor(ConfidenceLevel::NinetyNine, 3), dec!(10.05));
        assert_eq!(table.factor(ConfidenceLevel::Ninety, 2), dec!(5.33));
    }

    #[test]
    fn test_lookup_beyond_table_uses_flat_fallback() {
        let table = ReliabilityFactorTable::standard();
        for cl in ConfidenceLevel::ALL {
            for errors in [4, 5, 10, 1000] {
                let lookup = table.lookup(cl, errors);
                assert_eq!(lookup.factor, dec!(3.0));
                assert!(lookup.fallback);
            }
        }
    }

    #[test]
    fn test_factors_increase_with_errors() {
        let table = ReliabilityFactorTable::standard();
        for cl in ConfidenceLevel::ALL {
            let row = table.row(cl);
            assert!(row.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
