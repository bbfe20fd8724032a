use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::PromptId;

/// A stored prompt with its title, body text and tags.
///
/// Prompts are the only persisted record in the library. The analysis
/// functions read them but never create or mutate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Opaque identifier, fixed at creation.
    pub id: PromptId,
    /// Short human-readable title.
    pub title: String,
    /// The prompt text itself.
    pub content: String,
    /// Tags in the order the user entered them. Unique and case-sensitive.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When this prompt was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When this prompt was last edited. Never earlier than `created_at`.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Prompt {
    /// Title and content joined with a single space, the text that keyword
    /// based comparisons work on.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Returns true if this prompt carries exactly the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Builder for constructing `Prompt` instances with optional fields.
///
/// # Examples
///
/// ```
/// use promptlib::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .id("1")
///     .title("Creative Writing")
///     .content("Write a story about dragons")
///     .tags(vec!["writing".to_string()])
///     .build();
///
/// assert_eq!(prompt.id.as_str(), "1");
/// assert_eq!(prompt.tags, vec!["writing"]);
/// assert_eq!(prompt.created_at, prompt.updated_at);
/// ```
#[derive(Debug, Default)]
pub struct PromptBuilder {
    id: Option<PromptId>,
    title: Option<String>,
    content: Option<String>,
    tags: Option<Vec<String>>,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

impl PromptBuilder {
    /// Creates a new `PromptBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prompt id.
    pub fn id(mut self, id: impl Into<PromptId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the tags.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sets the created timestamp.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the updated timestamp.
    pub fn updated_at(mut self, updated_at: OffsetDateTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the `Prompt`.
    ///
    /// A missing id is generated. Missing timestamps default to now, and a
    /// missing `updated_at` follows `created_at`.
    pub fn build(self) -> Prompt {
        let created_at = self.created_at.unwrap_or_else(OffsetDateTime::now_utc);
        Prompt {
            id: self.id.unwrap_or_else(PromptId::generate),
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn builder_generates_id_and_defaults() {
        let prompt = PromptBuilder::new().title("t").content("c").build();

        assert!(!prompt.id.as_str().is_empty());
        assert!(prompt.tags.is_empty());
        assert_eq!(prompt.created_at, prompt.updated_at);
    }

    #[test]
    fn serializes_with_camel_case_rfc3339_fields() {
        let prompt = PromptBuilder::new()
            .id("example1")
            .title("Creative Writing")
            .content("Write a short story")
            .tags(vec!["writing".to_string(), "creative".to_string()])
            .created_at(datetime!(2024-03-01 10:00 UTC))
            .updated_at(datetime!(2024-03-02 12:30 UTC))
            .build();

        let json: serde_json::Value = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json["id"], "example1");
        assert_eq!(json["createdAt"], "2024-03-01T10:00:00Z");
        assert_eq!(json["updatedAt"], "2024-03-02T12:30:00Z");
        assert_eq!(json["tags"][1], "creative");
    }

    #[test]
    fn deserializes_browser_export_without_tags_field() {
        let json = r#"{
            "id": "lq3k9x",
            "title": "Code Explanation",
            "content": "Explain this code",
            "createdAt": "2024-05-06T07:08:09.123Z",
            "updatedAt": "2024-05-06T07:08:09.123Z"
        }"#;

        let prompt: Prompt = serde_json::from_str(json).unwrap();
        assert_eq!(prompt.id, PromptId::new("lq3k9x"));
        assert!(prompt.tags.is_empty());
    }

    #[test]
    fn searchable_text_joins_title_and_content() {
        let prompt = PromptBuilder::new().title("Code Review").content("Explain this code").build();
        assert_eq!(prompt.searchable_text(), "Code Review Explain this code");
        assert!(!prompt.has_tag("code"));
    }
}
