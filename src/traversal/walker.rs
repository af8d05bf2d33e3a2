//! Depth-bounded deterministic repository walk
//!
//! Entries are enumerated in lexical (byte) order so two traversals of an
//! unchanged tree always yield identical work item sequences. A visited
//! set of canonicalized directory identities guards against symlink
//! cycles: each real directory is entered at most once per traversal.

use super::exclusions::ExclusionSet;
use super::manifests::scan_manifests;
use crate::error::{Error, Result};
use crate::notes::NoteLevel;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One schedulable unit of traversal-plus-analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Repository-relative path (empty for the root)
    pub path: PathBuf,
    /// Granularity to analyze at
    pub level: NoteLevel,
    /// Component depth of the path (root = 0)
    pub depth: usize,
}

/// Exclusion-aware, depth-bounded walker over a repository root
pub struct TraversalEngine {
    root: PathBuf,
}

impl TraversalEngine {
    /// Create a walker rooted at `root`; the root must exist.
    pub fn new(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::Traversal(format!(
                "Repository root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Repository root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Produce the ordered work items for one granularity.
    ///
    /// `max_depth` bounds directory descent: directories deeper than
    /// `max_depth` components are neither emitted nor entered; files
    /// inside an entered directory are always emitted. `max_depth` 0
    /// means the root only.
    pub fn traverse(
        &self,
        level: NoteLevel,
        max_depth: usize,
        exclusions: &ExclusionSet,
    ) -> Result<Vec<WorkItem>> {
        match level {
            NoteLevel::Module => scan_manifests(&self.root, exclusions),
            NoteLevel::Package => Ok(vec![WorkItem {
                path: PathBuf::new(),
                level: NoteLevel::Package,
                depth: 0,
            }]),
            NoteLevel::File | NoteLevel::Directory => {
                let mut items = Vec::new();
                let mut visited = HashSet::new();
                self.walk(
                    &self.root,
                    &PathBuf::new(),
                    0,
                    max_depth,
                    exclusions,
                    level,
                    &mut visited,
                    &mut items,
                )?;
                Ok(items)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn walk(
        &self,
        dir: &Path,
        relative: &Path,
        depth: usize,
        max_depth: usize,
        exclusions: &ExclusionSet,
        level: NoteLevel,
        visited: &mut HashSet<PathBuf>,
        items: &mut Vec<WorkItem>,
    ) -> Result<()> {
        // Cycle guard: enter each real directory at most once
        let identity = match dir.canonicalize() {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "Skipping unreadable directory: {}", e);
                return Ok(());
            }
        };
        if !visited.insert(identity) {
            tracing::debug!(dir = %dir.display(), "Already visited, skipping");
            return Ok(());
        }

        let mut entries: Vec<(String, PathBuf, bool)> = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.path().is_dir();
            entries.push((name, entry.path(), is_dir));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, path, is_dir) in entries {
            let child_relative = relative.join(&name);
            let relative_str = crate::notes::context::normalize(&child_relative);
            if exclusions.is_excluded(&relative_str) {
                continue;
            }

            if is_dir {
                let child_depth = depth + 1;
                if child_depth > max_depth {
                    continue;
                }
                if level == NoteLevel::Directory {
                    items.push(WorkItem {
                        path: child_relative.clone(),
                        level,
                        depth: child_depth,
                    });
                }
                self.walk(
                    &path,
                    &child_relative,
                    child_depth,
                    max_depth,
                    exclusions,
                    level,
                    visited,
                    items,
                )?;
            } else if level == NoteLevel::File {
                items.push(WorkItem {
                    path: child_relative,
                    level,
                    depth: depth + 1,
                });
            }
        }

        Ok(())
    }
}
