//! Conformance harness for the gamma squeeze core.
//!
//! This crate provides:
//! - Reference fixtures: log-gamma and squeeze values checked against the core
//! - Property checks: reflection, convexity, bound ordering, convergence
//! - Convergence sweeps: gap tables over a pivot range
//! - Structured JSONL logging with an artifact index
//! - Report generation: human-readable + machine-readable summaries

#![forbid(unsafe_code)]

pub mod error;
pub mod fixtures;
pub mod properties;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod sweep;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use sweep::{SweepReport, convergence_sweep};
pub use verify::{VerificationResult, VerificationSummary};
