//! Hierarchical analysis note cache
//!
//! Notes are persisted analysis artifacts keyed by (owner, path, level).
//! The store is a directory tree: each (path, level) slot is one JSON file
//! whose location is derived by [`keys::PathKeyCodec`], so clearing a path
//! prefix removes the whole subtree.

pub mod context;
pub mod keys;
pub mod record;
pub mod staleness;
pub mod store;

pub use context::ContextAggregator;
pub use keys::PathKeyCodec;
pub use record::{NoteLevel, NoteMetadata, NoteRecord};
pub use staleness::StalenessPolicy;
pub use store::NoteStore;
