use thiserror::Error;

use crate::PromptId;

/// Errors raised at the storage and import edges of the library.
///
/// The analysis and search functions never fail; only reading or writing the
/// backing store and validating user input can.
#[derive(Debug, Error)]
pub enum PromptError {
    /// SQLite errors from the key-value store
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON encoding/decoding errors for stored values
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Import payload that is not an array of prompts
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// No prompt with the given id
    #[error("Prompt not found: {0}")]
    NotFound(PromptId),

    /// A required text field was empty after trimming
    #[error("Prompt {0} cannot be empty")]
    EmptyField(&'static str),
}

impl PromptError {
    /// Returns true for errors caused by user input rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidImport(_) | Self::NotFound(_) | Self::EmptyField(_)
        )
    }
}
