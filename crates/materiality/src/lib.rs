//! # AuditCalc Materiality Module
//!
//! Overall, performance and clearly-trivial thresholds (AU-C 320), with an
//! append-only version history per engagement.
//!
//! ## Features
//! - Pure threshold computation with advisory (never blocking) flags
//! - One current version per engagement, optimistic concurrency on save
//! - Approval applies to one specific version; approved versions are never edited
//! - In-memory and SQLite ledgers

mod calculation;
mod calculator;
mod config;
mod error;
mod ledger;
mod service;
mod store;

pub use calculation::{MaterialityCalculation, MaterialityInputs, MaterialityThresholds, Rationale};
pub use calculator::{
    apply_guidance, compute_materiality, Advisory, MaterialityEngine, MaterialityResult,
    ThresholdKind,
};
pub use config::{AdvisoryRanges, MaterialityConfig};
pub use error::{LedgerError, MaterialityError};
pub use ledger::{InMemoryLedger, VersionLedger};
pub use service::{MaterialityService, SaveOutcome};
pub use store::SqliteLedger;
