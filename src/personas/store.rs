//! Persona store with builtin defaults and custom persona loading
//!
//! Builtin personas cover the four granularities. Custom personas come
//! from an optional JSON document; malformed documents are logged and
//! ignored rather than aborting startup. An unknown persona id, however,
//! is fatal: no analysis can run without persona parameters.

use crate::error::{Error, Result};
use crate::notes::NoteLevel;
use crate::personas::types::{Persona, PersonaDocument};
use std::path::Path;

/// Builtin + custom personas, looked up by id
pub struct PersonaStore {
    personas: Vec<Persona>,
}

impl PersonaStore {
    /// Store with builtins only
    pub fn new() -> Self {
        Self {
            personas: builtin_personas(),
        }
    }

    /// Store with builtins plus custom personas from a JSON document.
    /// A custom persona with a builtin id replaces the builtin.
    pub fn with_custom_file(path: &Path) -> Self {
        let mut personas = builtin_personas();

        match std::fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<PersonaDocument>(&data) {
                Ok(doc) => {
                    for custom in doc.personas {
                        personas.retain(|p| p.id != custom.id);
                        personas.push(custom);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse persona file {}: {}", path.display(), e)
                }
            },
            Err(e) => tracing::warn!("Failed to read persona file {}: {}", path.display(), e),
        }

        Self { personas }
    }

    /// List all personas
    pub fn list(&self) -> &[Persona] {
        &self.personas
    }

    /// Look up a persona by id; unknown ids are a configuration error.
    pub fn get(&self, id: &str) -> Result<&Persona> {
        self.personas
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::Config(format!("Unknown persona '{}'", id)))
    }
}

impl Default for PersonaStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Builtin personas shipped with RepoLens
fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona {
            id: "code-reviewer".to_string(),
            name: "Code Reviewer".to_string(),
            level: NoteLevel::File,
            level_name: "source file".to_string(),
            focus: "correctness, readability, error handling, and test coverage".to_string(),
            role: "a meticulous senior code reviewer".to_string(),
        },
        Persona {
            id: "architect".to_string(),
            name: "Architect".to_string(),
            level: NoteLevel::Directory,
            level_name: "directory".to_string(),
            focus: "cohesion, coupling, and how responsibilities are split across files"
                .to_string(),
            role: "a pragmatic software architect".to_string(),
        },
        Persona {
            id: "dependency-auditor".to_string(),
            name: "Dependency Auditor".to_string(),
            level: NoteLevel::Module,
            level_name: "module manifest".to_string(),
            focus: "dependency hygiene, version pinning, and supply-chain surface".to_string(),
            role: "a cautious dependency auditor".to_string(),
        },
        Persona {
            id: "tech-lead".to_string(),
            name: "Tech Lead".to_string(),
            level: NoteLevel::Package,
            level_name: "repository".to_string(),
            focus: "overall health, risks, and where the next engineering month should go"
                .to_string(),
            role: "a tech lead reporting to their team".to_string(),
        },
    ]
}
