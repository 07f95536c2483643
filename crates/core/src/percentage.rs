//! Percentage - Decimal wrapper constrained to the closed range 0..=100
//!
//! Materiality percentages are expressed 0-100, and the performance and
//! clearly-trivial percentages are applied to overall materiality, so a value
//! above 100 would break `performance <= overall`. The range is enforced at
//! construction.

use crate::error::CalcError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A percentage in the closed range 0..=100.
///
/// # Example
/// ```
/// use auditcalc_core::Percentage;
/// use rust_decimal::Decimal;
///
/// let pct = Percentage::new(Decimal::new(75, 0)).unwrap();
/// assert_eq!(pct.as_fraction(), Decimal::new(75, 2));
///
/// assert!(Percentage::new(Decimal::new(101, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new Percentage.
    ///
    /// Returns `InvalidInput` if the value is negative or above 100.
    pub fn new(value: Decimal) -> Result<Self, CalcError> {
        if value < Decimal::ZERO {
            Err(CalcError::invalid("percentage", format!("{} is negative", value)))
        } else if value > Decimal::ONE_HUNDRED {
            Err(CalcError::invalid("percentage", format!("{} exceeds 100", value)))
        } else {
            Ok(Self(value))
        }
    }

    /// Create a Percentage without validation.
    ///
    /// The caller MUST ensure the value is within 0..=100.
    /// Use only for trusted sources (e.g., built-in constant tables).
    #[inline]
    pub const fn new_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The percentage as a fraction (75 -> 0.75)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Apply this percentage to a base amount
    pub fn of(&self, base: Decimal) -> Option<Decimal> {
        base.checked_mul(self.0)?.checked_div(Decimal::ONE_HUNDRED)
    }

    /// True if the value lies within `[min, max]`
    pub fn within(&self, min: Decimal, max: Decimal) -> bool {
        self.0 >= min && self.0 <= max
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = CalcError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(pct: Percentage) -> Self {
        pct.0
    }
}

impl FromStr for Percentage {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%').trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|_| CalcError::invalid("percentage", format!("'{}' is not a number", s)))?;
        Self::new(value)
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}
