//! Analysis personas
//!
//! A persona is an opaque prompt-parameter bag: the core never interprets
//! its focus or role text, it only threads them into prompt templates.

pub mod store;
pub mod types;

pub use store::PersonaStore;
pub use types::Persona;
