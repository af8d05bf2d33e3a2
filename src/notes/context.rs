//! Context assembly for model calls
//!
//! Gathers every note relevant to a target path — the path itself, its
//! ancestor prefixes, and its descendant subtree — across all
//! granularities, most recent first. Missing notes at any level are
//! simply omitted.

use super::record::NoteRecord;
use super::store::NoteStore;
use std::path::{Component, Path};
use std::sync::Arc;

/// Loads and recency-sorts the notes surrounding a target path
pub struct ContextAggregator {
    store: Arc<NoteStore>,
}

impl ContextAggregator {
    /// Create an aggregator over a note store
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }

    /// Load all notes for `path` itself, its ancestors up to `max_depth`
    /// hops, and its descendants up to `max_depth` levels, sorted by
    /// timestamp descending.
    pub async fn load_context(&self, owner: &str, path: &Path, max_depth: usize) -> Vec<NoteRecord> {
        let target = normalize(path);
        let target_depth = segment_count(&target);

        let mut relevant: Vec<NoteRecord> = self
            .store
            .list_all(owner)
            .await
            .into_iter()
            .filter(|record| {
                let candidate = record.path.as_str();
                if candidate == target {
                    return true;
                }
                if is_ancestor(candidate, &target) {
                    let hops = target_depth - segment_count(candidate);
                    return hops <= max_depth;
                }
                if is_ancestor(&target, candidate) {
                    let levels = segment_count(candidate) - target_depth;
                    return levels <= max_depth;
                }
                false
            })
            .collect();

        relevant.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        relevant
    }
}

/// Normalize a relative path to `/`-joined components (`""` for the root)
pub fn normalize(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

fn segment_count(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split('/').count()
    }
}

/// True if `ancestor` is a strict prefix of `descendant` at a component
/// boundary. The root (`""`) is an ancestor of every non-root path.
fn is_ancestor(ancestor: &str, descendant: &str) -> bool {
    if ancestor == descendant {
        return false;
    }
    if ancestor.is_empty() {
        return !descendant.is_empty();
    }
    descendant.starts_with(ancestor)
        && descendant.as_bytes().get(ancestor.len()) == Some(&b'/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::record::{NoteLevel, NoteRecord};
    use chrono::{Duration, Utc};
    use serde_json::json;
    use tempfile::TempDir;

    async fn seed(store: &NoteStore, path: &str, level: NoteLevel, age_mins: i64) {
        let mut record = NoteRecord::new("owner", path, level, json!({"p": path}));
        record.timestamp = Utc::now() - Duration::minutes(age_mins);
        store.put(&record).await.unwrap();
    }

    async fn make_aggregator() -> (ContextAggregator, Arc<NoteStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(NoteStore::new(dir.path().to_path_buf()));
        (ContextAggregator::new(store.clone()), store, dir)
    }

    #[tokio::test]
    async fn test_includes_self_ancestors_descendants() {
        let (agg, store, _dir) = make_aggregator().await;
        seed(&store, "a/b", NoteLevel::Directory, 1).await;
        seed(&store, "a", NoteLevel::Directory, 2).await;
        seed(&store, "a/b/c.rs", NoteLevel::File, 3).await;
        seed(&store, "unrelated/x.rs", NoteLevel::File, 4).await;

        let context = agg.load_context("owner", Path::new("a/b"), 2).await;
        let paths: Vec<&str> = context.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a/b", "a", "a/b/c.rs"]);
    }

    #[tokio::test]
    async fn test_depth_bounds_respected() {
        let (agg, store, _dir) = make_aggregator().await;
        seed(&store, "a", NoteLevel::Directory, 1).await;
        seed(&store, "a/b", NoteLevel::Directory, 2).await;
        seed(&store, "a/b/c", NoteLevel::Directory, 3).await;
        seed(&store, "a/b/c/d", NoteLevel::Directory, 4).await;

        // From a/b with max_depth 1: parent a, child a/b/c, not a/b/c/d
        let context = agg.load_context("owner", Path::new("a/b"), 1).await;
        let paths: Vec<&str> = context.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "a/b", "a/b/c"]);
    }

    #[tokio::test]
    async fn test_sorted_most_recent_first() {
        let (agg, store, _dir) = make_aggregator().await;
        seed(&store, "a", NoteLevel::Directory, 30).await;
        seed(&store, "a/b.rs", NoteLevel::File, 10).await;
        seed(&store, "a/c.rs", NoteLevel::File, 20).await;

        let context = agg.load_context("owner", Path::new("a"), 3).await;
        let paths: Vec<&str> = context.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a/b.rs", "a/c.rs", "a"]);
    }

    #[tokio::test]
    async fn test_missing_notes_are_omitted() {
        let (agg, _store, _dir) = make_aggregator().await;
        let context = agg.load_context("owner", Path::new("a/b"), 3).await;
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn test_root_context_spans_whole_tree_within_depth() {
        let (agg, store, _dir) = make_aggregator().await;
        seed(&store, "", NoteLevel::Package, 1).await;
        seed(&store, "a", NoteLevel::Directory, 2).await;
        seed(&store, "a/b.rs", NoteLevel::File, 3).await;

        let context = agg.load_context("owner", Path::new(""), 1).await;
        let paths: Vec<&str> = context.iter().map(|r| r.path.as_str()).collect();
        // a/b.rs is 2 levels below the root, beyond max_depth 1
        assert_eq!(paths, vec!["", "a"]);
    }

    #[test]
    fn test_is_ancestor_component_boundary() {
        assert!(is_ancestor("a", "a/b"));
        assert!(is_ancestor("", "a"));
        assert!(!is_ancestor("a", "ab/c"));
        assert!(!is_ancestor("a/b", "a/b"));
    }
}
