//! RepoLens - Multi-Persona Repository Analysis
//!
//! RepoLens walks a repository at several granularities (files,
//! directories, module manifests, the package as a whole), asks a
//! text-generation model for a persona-flavored analysis of each work
//! item, and persists the results as JSON notes keyed by (owner, path,
//! level). Fresh notes are reused on later runs; stale ones are redone.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        CLI (main.rs)                        │
//! │   init · update · run · deep-dive · status · coach          │
//! └───────────────────────────┬────────────────────────────────┘
//!                             │
//! ┌───────────────────────────▼────────────────────────────────┐
//! │                  AnalysisOrchestrator                       │
//! │  per item: cached? ── yes ─▶ reuse verbatim                 │
//! │            └─ no ──▶ context + excerpt ─▶ model call        │
//! │                        │ ok: extract JSON ─▶ persist        │
//! │                        │ bad JSON: fallback ─▶ persist      │
//! │                        └ call failed: degrade (in memory)   │
//! └──────┬───────────────────┬──────────────────┬───────────────┘
//!        │                   │                  │
//! ┌──────▼──────┐   ┌────────▼───────┐   ┌─────▼──────────────┐
//! │ Traversal   │   │  Note store    │   │  Model client      │
//! │ lexical DFS │   │  file-per-slot │   │  messages API over │
//! │ exclusions  │   │  JSON records  │   │  HTTP, timeouts    │
//! │ cycle guard │   │  staleness     │   │  as Error::Service │
//! └─────────────┘   └────────────────┘   └────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`analysis`]: orchestration, aggregation, and result rendering
//! - [`notes`]: note records, the on-disk store, staleness, context
//! - [`traversal`]: deterministic depth-bounded repository walking
//! - [`personas`]: builtin and custom analysis personas
//! - [`model`]: model invocation client and prompt templating
//! - [`extract`]: JSON extraction from free-text model replies
//! - [`config`]: TOML configuration with per-section defaults

pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod notes;
pub mod personas;
pub mod traversal;

pub use config::RepoLensConfig;
pub use error::{Error, Result};
