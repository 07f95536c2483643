//! AuditCalc Core - Domain types
//!
//! This crate contains the fundamental types shared by the calculation engines:
//! - `ConfidenceLevel`: The three supported assurance levels (90/95/99)
//! - `BenchmarkType` / `RiskLevel`: Materiality classification enums
//! - `Percentage`: Decimal wrapper constrained to 0..=100
//! - `CalcError`: The error taxonomy for pure computations

pub mod benchmark;
pub mod confidence;
pub mod error;
pub mod percentage;

pub use benchmark::{BenchmarkType, RiskLevel};
pub use confidence::ConfidenceLevel;
pub use error::{CalcError, CalcResult};
pub use percentage::Percentage;
