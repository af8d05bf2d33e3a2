//! Note record wire types
//!
//! A note captures one analysis result for one (owner, path, level) slot.
//! Latest write wins; no history is retained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current on-disk note schema version
pub const NOTE_SCHEMA_VERSION: u32 = 1;

/// Granularity of an analysis note
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NoteLevel {
    /// A single source file
    File,
    /// A directory and its immediate contents
    Directory,
    /// A module manifest (Cargo.toml, package.json, ...)
    Module,
    /// The repository as a whole
    Package,
}

impl fmt::Display for NoteLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
            Self::Module => write!(f, "module"),
            Self::Package => write!(f, "package"),
        }
    }
}

impl FromStr for NoteLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "directory" => Ok(Self::Directory),
            "module" => Ok(Self::Module),
            "package" => Ok(Self::Package),
            _ => Err(format!("Unknown note level: {}", s)),
        }
    }
}

/// Metadata attached to a persisted note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteMetadata {
    /// Size of the serialized content in bytes
    pub size: u64,

    /// Schema version the note was written with
    pub version: u32,
}

/// A persisted analysis artifact for one (owner, path, level) tuple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Owner ID (persona that produced the note)
    pub owner: String,

    /// Normalized relative path of the analyzed subject
    pub path: String,

    /// Granularity of the analysis
    pub level: NoteLevel,

    /// Creation time; staleness is measured against this
    pub timestamp: DateTime<Utc>,

    /// Structured analysis payload (model output, opaque to the store)
    pub content: serde_json::Value,

    /// Size and schema version metadata
    pub metadata: NoteMetadata,
}

impl NoteRecord {
    /// Build a record for `content`, stamping size and schema version.
    pub fn new(
        owner: impl Into<String>,
        path: impl Into<String>,
        level: NoteLevel,
        content: serde_json::Value,
    ) -> Self {
        let size = serde_json::to_vec(&content).map(|v| v.len() as u64).unwrap_or(0);
        Self {
            owner: owner.into(),
            path: path.into(),
            level,
            timestamp: Utc::now(),
            content,
            metadata: NoteMetadata {
                size,
                version: NOTE_SCHEMA_VERSION,
            },
        }
    }
}
