use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a prompt.
///
/// Prompt ids are opaque strings: freshly created prompts get a UUID, while
/// imported libraries may carry whatever id the exporting application chose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(String);

impl PromptId {
    /// Wraps an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the underlying id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PromptId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PromptId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
