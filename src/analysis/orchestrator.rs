//! Reuse-or-analyze orchestration
//!
//! Per work item: a fresh cached note is reused verbatim; otherwise the
//! item's context is assembled, the model invocation service is called,
//! and the response is parsed and persisted. Extraction failure routes to
//! a deterministic fallback note (persisted, so the next run cache-hits);
//! call failure yields an in-memory degraded placeholder that is never
//! persisted, so the next run retries instead of repeating the failure.
//! One item failing never aborts the run.

use crate::analysis::aggregate::{AggregateResult, ItemOutcome, OutcomeStatus};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::extract::extract_json;
use crate::model::prompt::{
    render_analysis_prompt, render_summary_prompt, truncate_excerpt, MAX_EXCERPT_CHARS,
};
use crate::model::{CallOptions, ModelClient};
use crate::notes::context::normalize;
use crate::notes::{ContextAggregator, NoteLevel, NoteRecord, NoteStore, StalenessPolicy};
use crate::personas::Persona;
use crate::traversal::{ExclusionSet, TraversalEngine, WorkItem};
use chrono::Utc;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Confidence score stamped on fallback notes
const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Characters of raw text preserved in a fallback note
const FALLBACK_RAW_CHARS: usize = 1_000;

/// Drives one persona's analysis pass over a repository
pub struct AnalysisOrchestrator {
    engine: TraversalEngine,
    store: Arc<NoteStore>,
    context: ContextAggregator,
    policy: StalenessPolicy,
    client: Arc<dyn ModelClient>,
    model: String,
    options: CallOptions,
    max_depth: usize,
    concurrency: usize,
    exclusions: ExclusionSet,
    cancel: Arc<AtomicBool>,
}

impl AnalysisOrchestrator {
    /// Wire an orchestrator from explicit collaborators; nothing here
    /// reads ambient process state.
    pub fn new(
        engine: TraversalEngine,
        store: Arc<NoteStore>,
        client: Arc<dyn ModelClient>,
        model: String,
        config: &AnalysisConfig,
    ) -> Self {
        Self {
            engine,
            context: ContextAggregator::new(store.clone()),
            store,
            policy: StalenessPolicy::from_hours(config.max_note_age_hours),
            client,
            model,
            options: CallOptions::default(),
            max_depth: config.max_depth,
            concurrency: config.concurrency.max(1),
            exclusions: ExclusionSet::new(config.exclusions.clone()),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the staleness policy (tests, `--max-age` style flags)
    pub fn with_policy(mut self, policy: StalenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override per-call generation options
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Flag checked between work items; setting it aborts the run at the
    /// next item boundary (never mid-call).
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Run one persona over the requested granularities, bottom-up in the
    /// order given. Returns the aggregate even when items degraded.
    pub async fn run(&self, persona: &Persona, levels: &[NoteLevel]) -> Result<AggregateResult> {
        let mut result = AggregateResult::new(&persona.id);

        for &level in levels {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::info!("Run cancelled before {} pass", level);
                break;
            }

            let items = self.engine.traverse(level, self.max_depth, &self.exclusions)?;
            tracing::info!(level = %level, items = items.len(), "Starting analysis pass");

            let outcomes = self.process_items(persona, items).await;
            result.push_level(level, outcomes);
        }

        result.summary = self.synthesize_summary(persona, &result).await;
        Ok(result)
    }

    /// Analyze one explicit path with maximum context (deep-dive), bypassing
    /// traversal. The level is the persona's own granularity unless the
    /// path is a directory.
    pub async fn analyze_path(&self, persona: &Persona, path: &Path) -> ItemOutcome {
        let absolute = self.engine.root().join(path);
        let level = if absolute.is_dir() && persona.level == NoteLevel::File {
            NoteLevel::Directory
        } else {
            persona.level
        };
        let item = WorkItem {
            path: path.to_path_buf(),
            level,
            depth: path.components().count(),
        };
        self.process_item(persona, item).await
    }

    /// Synthesize a coaching narrative from already-persisted notes only;
    /// no traversal, no per-item calls.
    pub async fn coach(&self, persona: &Persona) -> String {
        let notes = self.store.list_all(&persona.id).await;
        if notes.is_empty() {
            return "No notes recorded yet; run an analysis pass first.".to_string();
        }

        let mut counts: std::collections::BTreeMap<NoteLevel, usize> = Default::default();
        let mut insights = Vec::new();
        for note in &notes {
            *counts.entry(note.level).or_default() += 1;
            if let Some(list) = note.content["insights"].as_array() {
                insights.extend(list.iter().filter_map(|v| v.as_str().map(String::from)));
            }
        }
        let counts: Vec<(NoteLevel, usize)> = counts.into_iter().collect();

        let prompt = render_summary_prompt(persona, &counts, &insights);
        match self.client.call(&self.model, &prompt, &self.options).await {
            Ok(reply) => reply.text,
            Err(e) => {
                tracing::warn!("Coaching synthesis failed: {}", e);
                format!(
                    "Coaching unavailable ({} notes on record); service error: {}",
                    notes.len(),
                    e
                )
            }
        }
    }

    /// Process items through a bounded worker pool: up to `concurrency`
    /// in flight, cancellation honored between batches, outcome order
    /// identical to item order.
    async fn process_items(&self, persona: &Persona, items: Vec<WorkItem>) -> Vec<ItemOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());

        for batch in items.chunks(self.concurrency) {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::info!("Run cancelled between work items");
                break;
            }
            let batch_outcomes = futures::future::join_all(
                batch.iter().map(|item| self.process_item(persona, item.clone())),
            )
            .await;
            outcomes.extend(batch_outcomes);
        }

        outcomes
    }

    /// The per-item state machine.
    async fn process_item(&self, persona: &Persona, item: WorkItem) -> ItemOutcome {
        let subject = normalize(&item.path);
        let now = Utc::now();

        // Cache hit: reuse verbatim, no call, no write
        if let Some(record) = self.store.get(&persona.id, &item.path, item.level).await {
            if self.policy.is_fresh(&record, now) {
                tracing::debug!(path = %subject, level = %item.level, "Cache hit");
                return ItemOutcome {
                    path: subject,
                    level: item.level,
                    status: OutcomeStatus::Cached,
                    analysis: record.content,
                };
            }
        }

        let context = self
            .context
            .load_context(&persona.id, &item.path, self.max_depth)
            .await;
        let excerpt = self.read_target(&item);
        let prompt = render_analysis_prompt(persona, &item.path, item.level, &excerpt, &context);

        let reply = match self.client.call(&self.model, &prompt, &self.options).await {
            Ok(reply) => reply,
            Err(e) => {
                // Not persisted: the next run should retry, not replay
                // this failure from cache.
                tracing::warn!(path = %subject, level = %item.level, "Model call failed: {}", e);
                return ItemOutcome {
                    path: subject,
                    level: item.level,
                    status: OutcomeStatus::Degraded,
                    analysis: degraded_content(&e.to_string()),
                };
            }
        };

        let (analysis, status) = match extract_json(&reply.text) {
            Ok(value) => (value, OutcomeStatus::Analyzed),
            Err(e) => {
                tracing::warn!(path = %subject, level = %item.level, "Extraction failed: {}", e);
                (fallback_content(&reply.text), OutcomeStatus::Fallback)
            }
        };

        let record = NoteRecord::new(&persona.id, subject.clone(), item.level, analysis.clone());
        let status = match self.store.put(&record).await {
            Ok(()) => status,
            Err(e) => {
                // A single failed write degrades this item only.
                tracing::warn!(path = %subject, level = %item.level, "Persist failed: {}", e);
                OutcomeStatus::Degraded
            }
        };

        ItemOutcome {
            path: subject,
            level: item.level,
            status,
            analysis,
        }
    }

    /// Read the analyzable content for a work item.
    fn read_target(&self, item: &WorkItem) -> String {
        let absolute = self.engine.root().join(&item.path);
        match item.level {
            NoteLevel::File | NoteLevel::Module => match std::fs::read_to_string(&absolute) {
                Ok(text) => truncate_excerpt(&text, MAX_EXCERPT_CHARS),
                Err(e) => {
                    tracing::debug!(path = %absolute.display(), "Unreadable target: {}", e);
                    "(binary or unreadable content)".to_string()
                }
            },
            NoteLevel::Directory | NoteLevel::Package => {
                let mut names: Vec<String> = std::fs::read_dir(&absolute)
                    .map(|entries| {
                        entries
                            .flatten()
                            .map(|e| e.file_name().to_string_lossy().into_owned())
                            .collect()
                    })
                    .unwrap_or_default();
                names.sort();
                names.join("\n")
            }
        }
    }

    /// One narrative summary call across the run; failure yields a
    /// placeholder, never an error.
    async fn synthesize_summary(&self, persona: &Persona, result: &AggregateResult) -> String {
        if result.total() == 0 {
            return "Nothing to analyze at the requested levels.".to_string();
        }

        let prompt = render_summary_prompt(persona, &result.counts(), &result.insights());
        match self.client.call(&self.model, &prompt, &self.options).await {
            Ok(reply) => reply.text,
            Err(e) => {
                tracing::warn!("Summary synthesis failed: {}", e);
                format!(
                    "Summary unavailable (service error). {} items analyzed, {} degraded.",
                    result.total(),
                    result.degraded()
                )
            }
        }
    }
}

/// Deterministic note content when no JSON was recoverable. Persisted so
/// the next run can cache-hit instead of re-asking.
fn fallback_content(raw: &str) -> serde_json::Value {
    json!({
        "summary": truncate_excerpt(raw, FALLBACK_RAW_CHARS),
        "insights": [],
        "concerns": [],
        "confidence": FALLBACK_CONFIDENCE,
        "fallback": true,
    })
}

/// In-memory placeholder when the service call itself failed.
fn degraded_content(error: &str) -> serde_json::Value {
    json!({
        "summary": format!("Analysis unavailable: {}", error),
        "insights": [],
        "concerns": [],
        "confidence": 0.0,
        "degraded": true,
    })
}
