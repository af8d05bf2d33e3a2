//! Prompt assembly
//!
//! Each work item gets a level-specific prompt combining the persona's
//! parameter bag, a truncated excerpt of the target, and the
//! recency-sorted context notes.

use crate::notes::{NoteLevel, NoteRecord};
use crate::personas::Persona;
use std::path::Path;

/// Maximum characters of target content included in a prompt
pub const MAX_EXCERPT_CHARS: usize = 8_000;

/// Maximum context notes included in a prompt
pub const MAX_CONTEXT_NOTES: usize = 12;

/// Truncate text to `max` characters on a char boundary, marking the cut.
pub fn truncate_excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}\n… [truncated]", cut)
}

/// Render the analysis prompt for one work item.
pub fn render_analysis_prompt(
    persona: &Persona,
    path: &Path,
    level: NoteLevel,
    target_excerpt: &str,
    context: &[NoteRecord],
) -> String {
    let subject = if path.as_os_str().is_empty() {
        "the repository root".to_string()
    } else {
        path.display().to_string()
    };

    let mut prompt = format!(
        "You are {role}. You are analyzing one {level_name} of a code repository.\n\
         Focus on: {focus}.\n\n\
         Subject ({level}): {subject}\n\n",
        role = persona.role,
        level_name = persona.level_name,
        focus = persona.focus,
        level = level,
        subject = subject,
    );

    if !context.is_empty() {
        prompt.push_str("Earlier notes about this area, most recent first:\n");
        for record in context.iter().take(MAX_CONTEXT_NOTES) {
            let summary = record.content["summary"].as_str().unwrap_or("(no summary)");
            prompt.push_str(&format!(
                "- [{} {}] {}\n",
                record.level, record.path, summary
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str("Content:\n");
    prompt.push_str(&truncate_excerpt(target_excerpt, MAX_EXCERPT_CHARS));
    prompt.push_str(
        "\n\nRespond with exactly one JSON object:\n\
         {\"summary\": \"<one paragraph>\", \"insights\": [\"...\"], \
         \"concerns\": [\"...\"], \"confidence\": <0.0-1.0>}\n",
    );

    prompt
}

/// Render the cross-item narrative summary prompt for a finished run.
pub fn render_summary_prompt(
    persona: &Persona,
    counts: &[(NoteLevel, usize)],
    insights: &[String],
) -> String {
    let mut prompt = format!(
        "You are {role}. An analysis pass over a repository just finished.\n\
         Items analyzed per level:\n",
        role = persona.role,
    );
    for (level, count) in counts {
        prompt.push_str(&format!("- {}: {}\n", level, count));
    }

    if !insights.is_empty() {
        prompt.push_str("\nCollected insights:\n");
        for insight in insights.iter().take(40) {
            prompt.push_str(&format!("- {}\n", insight));
        }
    }

    prompt.push_str(
        "\nWrite a short narrative summary (one or two paragraphs) of the \
         repository's state for: ",
    );
    prompt.push_str(&persona.focus);
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteRecord;
    use serde_json::json;

    fn persona() -> Persona {
        Persona {
            id: "code-reviewer".into(),
            name: "Code Reviewer".into(),
            level: NoteLevel::File,
            level_name: "source file".into(),
            focus: "correctness".into(),
            role: "a meticulous senior code reviewer".into(),
        }
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_excerpt("short", 100), "short");
    }

    #[test]
    fn test_truncate_marks_the_cut() {
        let long = "x".repeat(50);
        let truncated = truncate_excerpt(&long, 10);
        assert!(truncated.starts_with("xxxxxxxxxx"));
        assert!(truncated.ends_with("[truncated]"));
    }

    #[test]
    fn test_analysis_prompt_carries_persona_and_subject() {
        let prompt = render_analysis_prompt(
            &persona(),
            Path::new("src/lib.rs"),
            NoteLevel::File,
            "fn main() {}",
            &[],
        );
        assert!(prompt.contains("a meticulous senior code reviewer"));
        assert!(prompt.contains("src/lib.rs"));
        assert!(prompt.contains("fn main() {}"));
        assert!(prompt.contains("\"confidence\""));
    }

    #[test]
    fn test_analysis_prompt_root_subject() {
        let prompt =
            render_analysis_prompt(&persona(), Path::new(""), NoteLevel::Package, "listing", &[]);
        assert!(prompt.contains("the repository root"));
    }

    #[test]
    fn test_context_notes_rendered_and_capped() {
        let context: Vec<NoteRecord> = (0..20)
            .map(|i| {
                NoteRecord::new(
                    "owner",
                    format!("f{}.rs", i),
                    NoteLevel::File,
                    json!({"summary": format!("note {}", i)}),
                )
            })
            .collect();

        let prompt = render_analysis_prompt(
            &persona(),
            Path::new("src"),
            NoteLevel::Directory,
            "",
            &context,
        );
        assert!(prompt.contains("note 0"));
        assert!(prompt.contains("note 11"));
        assert!(!prompt.contains("note 12"));
    }

    #[test]
    fn test_summary_prompt_lists_counts() {
        let prompt = render_summary_prompt(
            &persona(),
            &[(NoteLevel::File, 4), (NoteLevel::Directory, 2)],
            &["insight one".to_string()],
        );
        assert!(prompt.contains("file: 4"));
        assert!(prompt.contains("directory: 2"));
        assert!(prompt.contains("insight one"));
    }
}
