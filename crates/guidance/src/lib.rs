//! AuditCalc Industry Guidance
//!
//! Supplies recommended materiality percentages per industry and benchmark.
//! Recommendations are advisory: callers may apply them to their inputs
//! before computing, the engines never consult a provider themselves.
//! Currently implements StaticGuidance; can be extended for firm-maintained
//! guidance libraries.

mod error;
mod static_table;
mod types;

pub use error::GuidanceError;
pub use static_table::StaticGuidance;
pub use types::{normalize_industry, GuidanceRecommendation, IndustryGuidance, GENERAL_INDUSTRY};
