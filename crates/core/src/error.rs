//! Error types for dk-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for dk-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for dk-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid storage path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid projection expression
    #[error("Invalid projection '{expr}': {reason}")]
    InvalidProjection { expr: String, reason: String },

    /// Object key not found; `exists` maps this to `Ok(false)`
    #[error("Not found: {0}")]
    KeyNotFound(String),

    /// Container (bucket) not found
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// Any other storage-service failure; never retried, never suppressed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Role assumption rejected or credential resolution failed
    #[error("Credential error: {0}")]
    Credential(String),

    /// Dataset parameter text that is not a valid JSON object
    #[error("Malformed dataset parameter: {0}")]
    MalformedParam(#[source] serde_json::Error),

    /// Dataset keyword mapping rejected by the registry
    #[error("Invalid dataset parameter: {0}")]
    InvalidDataset(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_)
            | Error::InvalidProjection { .. }
            | Error::Config(_)
            | Error::MalformedParam(_)
            | Error::InvalidDataset(_)
            | Error::InvalidUrl(_) => 2, // UsageError
            Error::Backend(_) => 3,      // NetworkError
            Error::Credential(_) => 4,   // AuthError
            Error::KeyNotFound(_) | Error::ContainerNotFound(_) => 5, // NotFound
            _ => 1,                      // GeneralError
        }
    }

    /// Whether this error is the backend's not-found signal
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound(_) | Error::ContainerNotFound(_))
    }
}
