//! File-backed note store
//!
//! One JSON file per (owner, path, level) slot under a root directory.
//! Slots for different keys never touch each other's files; writes to the
//! same slot are last-write-wins, which is sufficient because each slot
//! has exactly one logical owner per run.

use super::keys::PathKeyCodec;
use super::record::{NoteLevel, NoteRecord};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Persistent note store rooted at a directory tree
pub struct NoteStore {
    root: PathBuf,
}

impl NoteStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a note slot
    fn slot(&self, owner: &str, path: &Path, level: NoteLevel) -> PathBuf {
        self.root
            .join(owner)
            .join(PathKeyCodec::encode(path, level))
    }

    /// Persist a record, overwriting any previous note in the same slot.
    pub async fn put(&self, record: &NoteRecord) -> Result<()> {
        let slot = self.slot(&record.owner, Path::new(&record.path), record.level);

        if let Some(parent) = slot.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("create {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&slot, json)
            .await
            .map_err(|e| Error::Storage(format!("write {}: {}", slot.display(), e)))?;

        tracing::debug!(
            owner = %record.owner,
            path = %record.path,
            level = %record.level,
            "Persisted note"
        );
        Ok(())
    }

    /// Load the note for a slot. Absence is a normal outcome; a malformed
    /// stored record is logged and treated as absent, never surfaced as an
    /// error.
    pub async fn get(&self, owner: &str, path: &Path, level: NoteLevel) -> Option<NoteRecord> {
        let slot = self.slot(owner, path, level);

        let data = match tokio::fs::read_to_string(&slot).await {
            Ok(data) => data,
            Err(_) => return None,
        };

        match serde_json::from_str::<NoteRecord>(&data) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    slot = %slot.display(),
                    "Malformed stored note, treating as absent: {}",
                    e
                );
                None
            }
        }
    }

    /// List every note for an owner. Malformed entries are skipped with a
    /// warning.
    pub async fn list_all(&self, owner: &str) -> Vec<NoteRecord> {
        let mut records = Vec::new();
        let mut pending = vec![self.root.join(owner)];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(_) => continue,
            };

            while let Ok(Some(entry)) = entries.next_entry().await {
                let path = entry.path();
                let is_dir = entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false);

                if is_dir {
                    pending.push(path);
                    continue;
                }

                if !path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.ends_with(".note.json"))
                    .unwrap_or(false)
                {
                    continue;
                }

                match tokio::fs::read_to_string(&path).await {
                    Ok(data) => match serde_json::from_str::<NoteRecord>(&data) {
                        Ok(record) => records.push(record),
                        Err(e) => {
                            tracing::warn!(
                                slot = %path.display(),
                                "Skipping malformed note: {}",
                                e
                            );
                        }
                    },
                    Err(e) => {
                        tracing::warn!(slot = %path.display(), "Failed to read note: {}", e);
                    }
                }
            }
        }

        records
    }

    /// Remove every note under a subject path for an owner (the whole
    /// subtree, across all levels).
    pub async fn clear_path(&self, owner: &str, path: &Path) -> Result<()> {
        let prefix = self.root.join(owner).join(PathKeyCodec::encode_prefix(path));
        remove_subtree(&prefix).await
    }

    /// Remove every note belonging to an owner.
    pub async fn clear_owner(&self, owner: &str) -> Result<()> {
        remove_subtree(&self.root.join(owner)).await
    }
}

async fn remove_subtree(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Storage(format!("clear {}: {}", dir.display(), e))),
    }
}
