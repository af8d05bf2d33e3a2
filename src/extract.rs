//! Structured payload recovery from free-text model responses
//!
//! Model responses wrap a JSON payload in prose. The extractor locates
//! the first syntactically balanced JSON value and parses exactly that
//! substring, so producers are never required to emit pure JSON.
//!
//! This is an explicit finite-state scanner, not a regex: brackets that
//! appear inside quoted string values must not count toward balance, and
//! escape sequences must not terminate strings early.

use crate::error::{Error, Result};

/// Scanner state while walking the candidate value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Counting bracket depth outside any string literal
    Balanced,
    /// Inside a string literal; brackets are payload, not structure
    InString,
    /// Immediately after a backslash inside a string literal
    InStringEscape,
}

/// Recover the first balanced JSON value embedded in `text`.
///
/// Fails with [`Error::Extraction`] when no opening bracket exists, the
/// value never closes, or the balanced substring is not valid JSON.
pub fn extract_json(text: &str) -> Result<serde_json::Value> {
    let start = text
        .find(|c| c == '{' || c == '[')
        .ok_or_else(|| Error::Extraction("No JSON object or array found in response".into()))?;

    let mut state = ScanState::Balanced;
    let mut depth: usize = 0;

    for (offset, c) in text[start..].char_indices() {
        match state {
            ScanState::Balanced => match c {
                '{' | '[' => depth += 1,
                '}' | ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let candidate = &text[start..start + offset + 1];
                        return serde_json::from_str(candidate).map_err(|e| {
                            Error::Extraction(format!("Balanced candidate is not valid JSON: {}", e))
                        });
                    }
                }
                '"' => state = ScanState::InString,
                _ => {}
            },
            ScanState::InString => match c {
                '\\' => state = ScanState::InStringEscape,
                '"' => state = ScanState::Balanced,
                _ => {}
            },
            ScanState::InStringEscape => state = ScanState::InString,
        }
    }

    Err(Error::Extraction(
        "JSON value never closes in response".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_with_noise() {
        let value = json!({"summary": "fine", "issues": [1, 2, 3]});
        let text = format!("Sure! Here is my analysis:\n{}\nHope that helps.", value);
        assert_eq!(extract_json(&text).unwrap(), value);
    }

    #[test]
    fn test_array_payload() {
        let text = "the findings are [\"a\", \"b\"] as requested";
        assert_eq!(extract_json(text).unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn test_no_brackets_fails() {
        let err = extract_json("no braces here").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_unclosed_value_fails() {
        let err = extract_json("start {\"a\": 1").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_balanced_but_invalid_fails() {
        let err = extract_json("look: {not json}").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_braces_inside_strings_are_skipped() {
        let value = json!({"code": "fn main() { let v = vec![1]; }"});
        let text = format!("noise {} noise", value);
        assert_eq!(extract_json(&text).unwrap(), value);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let value = json!({"quote": "she said \"}{\" loudly"});
        let text = format!("prefix {} suffix", value);
        assert_eq!(extract_json(&text).unwrap(), value);
    }

    #[test]
    fn test_first_value_wins() {
        let text = "{\"first\": 1} and later {\"second\": 2}";
        assert_eq!(extract_json(text).unwrap(), json!({"first": 1}));
    }

    #[test]
    fn test_nested_mixed_brackets() {
        let value = json!({"matrix": [[1, 2], [3, 4]], "meta": {"depth": 2}});
        let text = format!("Result:\n```json\n{}\n```", value);
        assert_eq!(extract_json(&text).unwrap(), value);
    }

    #[test]
    fn test_pure_json_input() {
        let value = json!({"only": "json"});
        assert_eq!(extract_json(&value.to_string()).unwrap(), value);
    }
}
