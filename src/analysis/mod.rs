//! Analysis orchestration
//!
//! Drives the reuse-or-analyze decision for every work item, collects
//! per-level outcomes, and renders them for the CLI.

pub mod aggregate;
pub mod orchestrator;
pub mod report;

pub use aggregate::{AggregateResult, ItemOutcome, OutcomeStatus};
pub use orchestrator::AnalysisOrchestrator;
pub use report::{render_outcome, render_run, render_status, OutputFormat, StatusReport};
