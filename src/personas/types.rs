//! Persona wire types

use crate::notes::NoteLevel;
use serde::{Deserialize, Serialize};

/// An analysis perspective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Stable identifier (`--agent` flag value)
    pub id: String,

    /// Display name
    pub name: String,

    /// Granularity this persona analyzes at
    pub level: NoteLevel,

    /// Human label for the level ("source file", "subsystem", ...)
    pub level_name: String,

    /// What the persona pays attention to
    pub focus: String,

    /// The role the persona plays in its prompts
    pub role: String,
}

/// Document shape for a custom persona file: a flat list
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PersonaDocument {
    #[serde(default)]
    pub personas: Vec<Persona>,
}
