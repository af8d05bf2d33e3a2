//! Per-run aggregation of work item outcomes
//!
//! An `AggregateResult` is built once per traversal invocation and owned
//! by it; nothing here outlives the run except what the note store
//! already persisted.

use crate::notes::NoteLevel;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// How one work item's analysis was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Fresh note reused verbatim, no model call
    Cached,
    /// New analysis parsed and persisted
    Analyzed,
    /// Model responded but no JSON was recoverable; deterministic
    /// fallback persisted
    Fallback,
    /// Model call or persistence failed; in-memory placeholder only
    Degraded,
}

/// Result for one work item
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    /// Normalized subject path (empty for the root)
    pub path: String,
    /// Granularity
    pub level: NoteLevel,
    /// How the analysis was obtained
    pub status: OutcomeStatus,
    /// The analysis payload
    pub analysis: serde_json::Value,
}

/// Everything one analysis run produced
#[derive(Debug, Serialize)]
pub struct AggregateResult {
    /// Unique id of this run
    pub run_id: Uuid,
    /// Persona that owned the run
    pub owner: String,
    /// Ordered outcomes per level
    pub per_level: BTreeMap<NoteLevel, Vec<ItemOutcome>>,
    /// Narrative summary (placeholder when synthesis was unavailable)
    pub summary: String,
}

impl AggregateResult {
    /// Start an empty result for a run
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            owner: owner.into(),
            per_level: BTreeMap::new(),
            summary: String::new(),
        }
    }

    /// Append one level's ordered outcomes
    pub fn push_level(&mut self, level: NoteLevel, outcomes: Vec<ItemOutcome>) {
        self.per_level.entry(level).or_default().extend(outcomes);
    }

    /// Item counts per level, in level order
    pub fn counts(&self) -> Vec<(NoteLevel, usize)> {
        self.per_level
            .iter()
            .map(|(level, outcomes)| (*level, outcomes.len()))
            .collect()
    }

    /// Total number of outcomes across all levels
    pub fn total(&self) -> usize {
        self.per_level.values().map(Vec::len).sum()
    }

    /// Number of degraded outcomes
    pub fn degraded(&self) -> usize {
        self.per_level
            .values()
            .flatten()
            .filter(|o| o.status == OutcomeStatus::Degraded)
            .count()
    }

    /// All insight strings reported across outcomes, in outcome order
    pub fn insights(&self) -> Vec<String> {
        self.per_level
            .values()
            .flatten()
            .filter_map(|o| o.analysis["insights"].as_array())
            .flatten()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()
    }
}
