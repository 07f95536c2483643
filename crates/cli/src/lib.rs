//! AuditCalc CLI - orchestration layer
//!
//! Validates command input, calls the pure engines and drives the ledger.

pub mod commands;
pub mod context;

pub use context::AppContext;
