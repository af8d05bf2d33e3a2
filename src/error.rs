//! RepoLens error types

use thiserror::Error;

/// RepoLens error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (unknown persona, missing credential)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Note store I/O failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// No well-formed JSON value recoverable from free text
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Model invocation service failure (network, auth, rate-limit, bad body)
    #[error("Service error: {0}")]
    Service(String),

    /// Repository traversal error
    #[error("Traversal error: {0}")]
    Traversal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for RepoLens operations
pub type Result<T> = std::result::Result<T, Error>;
