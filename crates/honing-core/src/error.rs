//! Error types for the honing engine.

use honing_model::ModelError;
use thiserror::Error;

/// Errors raised by the change engine, transducer and speech boundary.
#[derive(Debug, Error)]
pub enum HoningError {
    /// A rule pattern is not a valid regular expression.
    #[error("Invalid rule pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A batch change has more pairs than the configured limit.
    #[error("Batch of {size} changes exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    /// An operation needing sample text was given none.
    #[error("Sample text is empty")]
    EmptySampleText,

    /// A substitution pair with an empty source phoneme.
    #[error("Cannot substitute an empty phoneme")]
    EmptyPhoneme,

    /// A speech rate name that is not one of the SSML prosody rates.
    #[error("Unknown speech speed '{value}'")]
    UnknownSpeed { value: String },

    /// A speech backend reported a failure.
    #[error("Speech engine error: {message}")]
    Speech { message: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl HoningError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPattern { pattern, source } => {
                format!("The rule pattern '{pattern}' could not be compiled: {source}")
            }
            Self::BatchTooLarge { size, limit } => format!(
                "{size} substitutions were requested but at most {limit} can be applied at once."
            ),
            Self::EmptySampleText => "Enter some sample text first.".to_string(),
            Self::EmptyPhoneme => "Choose a phoneme to replace.".to_string(),
            Self::UnknownSpeed { value } => format!(
                "'{value}' is not a speech speed. Use x-slow, slow, medium, fast or x-fast."
            ),
            Self::Speech { message } => format!("Speech generation failed: {message}"),
            Self::Model(err) => err.user_message(),
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, HoningError>;
