use std::collections::HashSet;

/// Clean-up for user-entered tag lists.
///
/// Stored tags are case-sensitive, so unlike free-text analysis this keeps
/// each tag's spelling intact and only trims and deduplicates.
pub struct TagNormalizer;

impl TagNormalizer {
    /// Parses a comma-separated tag field.
    ///
    /// Splits on commas, trims whitespace from each tag, drops empty entries
    /// and removes exact duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptlib::nlp::TagNormalizer;
    ///
    /// assert_eq!(TagNormalizer::parse("rust, learning, "), vec!["rust", "learning"]);
    /// assert_eq!(TagNormalizer::parse("Rust,rust,Rust"), vec!["Rust", "rust"]);
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Vec<String> {
        Self::dedupe(input.split(',').map(String::from))
    }

    /// Trims tags, drops empty ones and removes exact duplicates.
    ///
    /// Preserves order of first occurrence.
    #[must_use]
    pub fn dedupe<I>(tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        tags.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
            .collect()
    }
}
