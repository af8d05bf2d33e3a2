//! Storage key derivation for note slots
//!
//! Maps (path, level) to a relative location inside the note store.
//! Sanitization is lossy: any character outside `[A-Za-z0-9._-]` becomes
//! `_`, so distinct real paths can collide (`a b` and `a_b` share a key).
//! A collision-safe scheme (e.g. a content hash suffix) would change the
//! on-disk layout, so the lossy mapping is kept and documented instead.

use super::record::NoteLevel;
use std::path::{Component, Path, PathBuf};

/// Reserved key segment for the repository root. Sanitization can never
/// produce a leading `__root__` component for a real path because real
/// components are sanitized per character, not wrapped in underscores by
/// the codec itself — the segment is only ever emitted for `""` or `"."`.
pub const ROOT_KEY: &str = "__root__";

/// Deterministic (path, level) → storage key codec
pub struct PathKeyCodec;

impl PathKeyCodec {
    /// Encode a subject path and level into a relative storage key.
    ///
    /// The key mirrors the subject's directory structure so that clearing
    /// a path prefix removes every note beneath it. The leaf file name is
    /// `<level>.note.json`.
    pub fn encode(path: &Path, level: NoteLevel) -> PathBuf {
        let mut key = PathBuf::new();
        let mut has_component = false;

        for component in path.components() {
            match component {
                Component::Normal(part) => {
                    key.push(Self::sanitize_component(&part.to_string_lossy()));
                    has_component = true;
                }
                // `.` and any prefix/root noise collapse away; the caller
                // passes repository-relative paths
                _ => {}
            }
        }

        if !has_component {
            key.push(ROOT_KEY);
        }

        key.push(format!("{}.note.json", level));
        key
    }

    /// Encode just the subject directory (no level leaf), used for
    /// subtree-granular operations like `clear`.
    pub fn encode_prefix(path: &Path) -> PathBuf {
        let mut key = PathBuf::new();
        let mut has_component = false;

        for component in path.components() {
            if let Component::Normal(part) = component {
                key.push(Self::sanitize_component(&part.to_string_lossy()));
                has_component = true;
            }
        }

        if !has_component {
            key.push(ROOT_KEY);
        }

        key
    }

    /// Replace every character outside the safe set with `_`.
    fn sanitize_component(component: &str) -> String {
        component
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_simple_path() {
        let key = PathKeyCodec::encode(Path::new("src/lib.rs"), NoteLevel::File);
        assert_eq!(key, PathBuf::from("src/lib.rs/file.note.json"));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = PathKeyCodec::encode(Path::new("a/b/c"), NoteLevel::Directory);
        let b = PathKeyCodec::encode(Path::new("a/b/c"), NoteLevel::Directory);
        assert_eq!(a, b);
    }

    #[test]
    fn test_levels_get_distinct_slots() {
        let file = PathKeyCodec::encode(Path::new("src"), NoteLevel::File);
        let dir = PathKeyCodec::encode(Path::new("src"), NoteLevel::Directory);
        assert_ne!(file, dir);
    }

    #[test]
    fn test_root_path_reserved_key() {
        let empty = PathKeyCodec::encode(Path::new(""), NoteLevel::Package);
        let dot = PathKeyCodec::encode(Path::new("."), NoteLevel::Package);
        assert_eq!(empty, PathBuf::from("__root__/package.note.json"));
        assert_eq!(dot, empty);
    }

    #[test]
    fn test_sanitization_replaces_unsafe_chars() {
        let key = PathKeyCodec::encode(Path::new("a b/c#d.rs"), NoteLevel::File);
        assert_eq!(key, PathBuf::from("a_b/c_d.rs/file.note.json"));
    }

    #[test]
    fn test_sanitization_is_lossy_and_can_collide() {
        // Known limitation: `_` is in the safe set and is also the
        // placeholder, so these two distinct paths share a slot.
        let spaced = PathKeyCodec::encode(Path::new("a b"), NoteLevel::File);
        let underscored = PathKeyCodec::encode(Path::new("a_b"), NoteLevel::File);
        assert_eq!(spaced, underscored);
    }

    #[test]
    fn test_encode_prefix_has_no_leaf() {
        let prefix = PathKeyCodec::encode_prefix(Path::new("src/notes"));
        assert_eq!(prefix, PathBuf::from("src/notes"));

        let root = PathKeyCodec::encode_prefix(Path::new(""));
        assert_eq!(root, PathBuf::from("__root__"));
    }
}
