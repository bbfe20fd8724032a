use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Prompt;

/// Ordering applied to search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Highest relevance first. Without a query, keeps input order.
    #[default]
    Relevance,
    /// Most recently updated first.
    Date,
    /// Alphabetical by title.
    Title,
}

impl SortBy {
    /// Sorts prompts in place. Stable, so equal keys keep their input order.
    ///
    /// `Relevance` leaves the slice untouched since there is no score to
    /// order by.
    pub fn sort_prompts(self, prompts: &mut [&Prompt]) {
        match self {
            Self::Relevance => {}
            Self::Date => prompts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            Self::Title => prompts.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        }
    }
}

/// Case-insensitive title order, falling back to exact order so the result
/// is total.
pub(crate) fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Inclusive creation-date bounds. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

impl DateRange {
    /// Returns true if `at` falls within both bounds.
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// Options for a prompt search.
///
/// # Examples
///
/// ```
/// use promptlib::search::{SearchOptions, SortBy};
///
/// // Everything, in input order
/// let options = SearchOptions::default();
/// assert!(options.fuzzy_match);
///
/// // Prompts tagged both "writing" and "creative", newest first
/// let options = SearchOptions {
///     tags: vec!["writing".to_string(), "creative".to_string()],
///     sort_by: SortBy::Date,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Free-text query. Empty means no text matching.
    pub query: String,
    /// Tags a prompt must ALL carry to be returned.
    pub tags: Vec<String>,
    /// Optional creation-date filter.
    pub date_range: Option<DateRange>,
    /// Allow edit-distance matches on title and content.
    pub fuzzy_match: bool,
    pub search_in_content: bool,
    pub search_in_title: bool,
    pub sort_by: SortBy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            tags: Vec::new(),
            date_range: None,
            fuzzy_match: true,
            search_in_content: true,
            search_in_title: true,
            sort_by: SortBy::Relevance,
        }
    }
}

impl SearchOptions {
    /// Options for a plain text query with every other setting at its default.
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}
