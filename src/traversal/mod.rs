//! Repository traversal
//!
//! Produces the ordered work items one analysis run consumes: a
//! depth-bounded, exclusion-filtered, deterministic walk for files and
//! directories, a flat manifest scan for modules, and a single root item
//! for the package level.

pub mod exclusions;
pub mod manifests;
pub mod walker;

pub use exclusions::ExclusionSet;
pub use manifests::MANIFEST_NAMES;
pub use walker::{TraversalEngine, WorkItem};
