//! Model and persistence error types.
//!
//! Persistence failures carry the path and operation so callers can show
//! a readable message without digging through the source chain.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while parsing, loading or saving language data.
#[derive(Debug, Error)]
pub enum ModelError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The language file is not valid JSON or does not match the language shape.
    #[error("Failed to parse language data from {path}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The language could not be serialized.
    #[error("Failed to serialize language data")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A change-history key could not be parsed.
    #[error("Invalid change key '{key}': {reason}")]
    InvalidChangeKey { key: String, reason: String },
}

impl ModelError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::Deserialization { path, source } => format!(
                "The file at {} is not a valid language file (line {}, column {}).",
                path.display(),
                source.line(),
                source.column()
            ),
            Self::Serialization { .. } => {
                "An error occurred while writing the language data.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::InvalidChangeKey { key, .. } => {
                format!("The change history contains an unreadable key: {key}")
            }
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
