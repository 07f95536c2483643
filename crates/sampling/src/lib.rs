//! AuditCalc Sampling Engine
//!
//! Computes required audit sample sizes (AU-C 530) for three methods:
//! - Monetary Unit Sampling (MUS)
//! - Classical Variables Sampling
//! - Attribute Sampling
//!
//! Every result carries the intermediate values of its formula so the working
//! can be documented. The formulas are simplified conventions, not
//! distribution-based statistics.
//!
//! Missing or zero inputs resolve to a zero sample size with an `Incomplete`
//! status, so callers can recompute on every keystroke without handling errors.

pub mod attribute;
pub mod classical;
pub mod engine;
pub mod input;
pub mod mus;
pub mod reliability;
pub mod result;

pub use engine::{compute_sampling, SamplingEngine};
pub use input::{AttributeInput, ClassicalInput, MusInput, SamplingInput, SamplingMethod};
pub use reliability::{ReliabilityFactorTable, ReliabilityLookup};
pub use result::{
    AttributeTrace, ClassicalTrace, MusTrace, SamplingResult, SamplingStatus, SamplingTrace,
};
