//! Module manifest detection
//!
//! A flat, non-recursive scan of the repository root for known manifest
//! and lockfile names. Deliberately separate from the recursive walk:
//! module-level analysis looks at what the repository declares, not where
//! its code lives.

use super::exclusions::ExclusionSet;
use super::walker::WorkItem;
use crate::error::Result;
use crate::notes::NoteLevel;
use std::path::Path;

/// Manifest and lockfile names that mark a module boundary
pub const MANIFEST_NAMES: &[&str] = &[
    "Cargo.toml",
    "Cargo.lock",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pyproject.toml",
    "requirements.txt",
    "go.mod",
    "go.sum",
    "pom.xml",
    "build.gradle",
    "Gemfile",
    "composer.json",
];

/// Scan the root directory (only) for module manifests, in lexical order.
pub fn scan_manifests(root: &Path, exclusions: &ExclusionSet) -> Result<Vec<WorkItem>> {
    let mut names: Vec<String> = Vec::new();

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if MANIFEST_NAMES.contains(&name.as_str()) && !exclusions.is_excluded(&name) {
            names.push(name);
        }
    }

    names.sort();

    Ok(names
        .into_iter()
        .map(|name| WorkItem {
            path: name.into(),
            level: NoteLevel::Module,
            depth: 1,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_finds_root_manifests_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "").unwrap();
        std::fs::write(dir.path().join("main.rs"), "").unwrap();

        let items = scan_manifests(dir.path(), &ExclusionSet::default()).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.path.to_str().unwrap()).collect();
        assert_eq!(names, vec!["Cargo.toml", "package.json"]);
        assert!(items.iter().all(|i| i.level == NoteLevel::Module));
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/Cargo.toml"), "").unwrap();

        let items = scan_manifests(dir.path(), &ExclusionSet::default()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_exclusions_apply() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "").unwrap();

        let set = ExclusionSet::new(vec!["Cargo".to_string()]);
        let items = scan_manifests(dir.path(), &set).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_empty_root() {
        let dir = TempDir::new().unwrap();
        let items = scan_manifests(dir.path(), &ExclusionSet::default()).unwrap();
        assert!(items.is_empty());
    }
}
