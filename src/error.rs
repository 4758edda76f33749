//! Error types for the change-tracking cache.

use thiserror::Error;

/// Path resolution and container errors
///
/// These stay internal to the core Mutation API, which reports plain success
/// or failure. The tracked views surface them directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Type mismatch at {path}: expected {expected}")]
    TypeMismatch { path: String, expected: &'static str },

    #[error("Index {index} out of range for {path} (len {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("Value not present in sequence at {0}")]
    ValueAbsent(String),

    #[error("Container at {0} is empty")]
    EmptyContainer(String),
}

/// Errors raised outside the core engine: configuration, I/O, parsing
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
