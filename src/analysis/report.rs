//! Result rendering for the CLI
//!
//! Every subcommand funnels its output through here so `--format json`
//! stays machine-readable end to end.

use crate::analysis::aggregate::{AggregateResult, ItemOutcome, OutcomeStatus};
use crate::error::Result;
use crate::notes::{NoteLevel, NoteRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Output format selected with `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutcomeStatus {
    fn tag(self) -> &'static str {
        match self {
            Self::Cached => "cached",
            Self::Analyzed => "analyzed",
            Self::Fallback => "fallback",
            Self::Degraded => "degraded",
        }
    }
}

/// Render one finished run.
pub fn render_run(result: &AggregateResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "Run {} ({})", result.run_id, result.owner);
            for (level, outcomes) in &result.per_level {
                let _ = writeln!(out, "\n[{}] {} items", level, outcomes.len());
                for outcome in outcomes {
                    let subject = if outcome.path.is_empty() {
                        "(root)"
                    } else {
                        outcome.path.as_str()
                    };
                    let summary = outcome.analysis["summary"].as_str().unwrap_or("");
                    let _ = writeln!(
                        out,
                        "  {:<9} {}  {}",
                        outcome.status.tag(),
                        subject,
                        first_line(summary, 100)
                    );
                }
            }
            if !result.summary.is_empty() {
                let _ = writeln!(out, "\nSummary:\n{}", result.summary);
            }
            if result.degraded() > 0 {
                let _ = writeln!(
                    out,
                    "\n{} of {} items degraded; re-run to retry them.",
                    result.degraded(),
                    result.total()
                );
            }
            Ok(out)
        }
    }
}

/// Render a single deep-dive outcome.
pub fn render_outcome(outcome: &ItemOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "{} [{} {}]",
                outcome.status.tag(),
                outcome.level,
                outcome.path
            );
            let _ = writeln!(out, "{}", serde_json::to_string_pretty(&outcome.analysis)?);
            Ok(out)
        }
    }
}

/// Cached-note inventory for one owner, built without any model calls
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub owner: String,
    pub total: usize,
    pub per_level: BTreeMap<NoteLevel, usize>,
    pub newest: Option<DateTime<Utc>>,
    pub oldest: Option<DateTime<Utc>>,
}

impl StatusReport {
    /// Summarize the notes currently on disk for one owner.
    pub fn from_notes(owner: impl Into<String>, notes: &[NoteRecord]) -> Self {
        let mut per_level = BTreeMap::new();
        for note in notes {
            *per_level.entry(note.level).or_insert(0) += 1;
        }
        Self {
            owner: owner.into(),
            total: notes.len(),
            per_level,
            newest: notes.iter().map(|n| n.timestamp).max(),
            oldest: notes.iter().map(|n| n.timestamp).min(),
        }
    }
}

/// Render the status reports for one or more owners.
pub fn render_status(reports: &[StatusReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for report in reports {
                let _ = writeln!(out, "{}: {} notes", report.owner, report.total);
                for (level, count) in &report.per_level {
                    let _ = writeln!(out, "  {}: {}", level, count);
                }
                if let (Some(newest), Some(oldest)) = (report.newest, report.oldest) {
                    let _ = writeln!(
                        out,
                        "  newest {}, oldest {}",
                        newest.format("%Y-%m-%d %H:%M:%S UTC"),
                        oldest.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
            }
            if reports.is_empty() {
                out.push_str("No notes recorded.\n");
            }
            Ok(out)
        }
    }
}

fn first_line(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn sample_run() -> AggregateResult {
        let mut result = AggregateResult::new("code-reviewer");
        result.run_id = Uuid::nil();
        result.push_level(
            NoteLevel::File,
            vec![
                ItemOutcome {
                    path: "src/lib.rs".into(),
                    level: NoteLevel::File,
                    status: OutcomeStatus::Analyzed,
                    analysis: json!({"summary": "entry point"}),
                },
                ItemOutcome {
                    path: "src/x.rs".into(),
                    level: NoteLevel::File,
                    status: OutcomeStatus::Degraded,
                    analysis: json!({"summary": "unavailable"}),
                },
            ],
        );
        result.summary = "overall fine".into();
        result
    }

    #[test]
    fn test_text_run_lists_items_and_degradation() {
        let text = render_run(&sample_run(), OutputFormat::Text).unwrap();
        assert!(text.contains("analyzed"));
        assert!(text.contains("src/lib.rs"));
        assert!(text.contains("entry point"));
        assert!(text.contains("overall fine"));
        assert!(text.contains("1 of 2 items degraded"));
    }

    #[test]
    fn test_json_run_is_parseable() {
        let rendered = render_run(&sample_run(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["owner"], "code-reviewer");
        assert_eq!(value["per_level"]["file"][1]["status"], "degraded");
    }

    #[test]
    fn test_outcome_text_render() {
        let outcome = ItemOutcome {
            path: "src/lib.rs".into(),
            level: NoteLevel::File,
            status: OutcomeStatus::Analyzed,
            analysis: json!({"summary": "ok"}),
        };
        let text = render_outcome(&outcome, OutputFormat::Text).unwrap();
        assert!(text.starts_with("analyzed [file src/lib.rs]"));
        assert!(text.contains("\"summary\""));
    }

    #[test]
    fn test_status_report_from_notes() {
        let notes = vec![
            NoteRecord::new("o", "a.rs", NoteLevel::File, json!({})),
            NoteRecord::new("o", "b.rs", NoteLevel::File, json!({})),
            NoteRecord::new("o", "src", NoteLevel::Directory, json!({})),
        ];
        let report = StatusReport::from_notes("o", &notes);
        assert_eq!(report.total, 3);
        assert_eq!(report.per_level[&NoteLevel::File], 2);
        assert_eq!(report.per_level[&NoteLevel::Directory], 1);
        assert!(report.newest.is_some());
    }

    #[test]
    fn test_status_text_empty() {
        let text = render_status(&[], OutputFormat::Text).unwrap();
        assert!(text.contains("No notes recorded"));
    }
}
