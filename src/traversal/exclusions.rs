//! Traversal exclusion rules

/// Dot-prefixed entries are skipped implicitly, with this one exception:
/// CI workflows are part of the analyzable surface.
const DOT_EXCEPTION: &str = ".github";

/// Substring-based path exclusion set
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    substrings: Vec<String>,
}

impl ExclusionSet {
    /// Build from a list of substrings
    pub fn new(substrings: Vec<String>) -> Self {
        Self { substrings }
    }

    /// Add one more exclusion substring
    pub fn add(&mut self, substring: impl Into<String>) {
        self.substrings.push(substring.into());
    }

    /// True if the normalized relative path should be excluded: either its
    /// full path contains a configured substring, or any component is
    /// dot-prefixed (except the allowed exception).
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        if self.substrings.iter().any(|s| relative_path.contains(s.as_str())) {
            return true;
        }

        relative_path
            .split('/')
            .any(|component| component.starts_with('.') && component != DOT_EXCEPTION)
    }
}
