use std::collections::HashSet;

use tracing::{debug, warn};

use super::{SearchHistory, SearchOptions, SortBy, fuzzy_match};
use crate::store::{KeyValueStore, read_json, write_json};
use crate::{Prompt, PromptError};

/// Store key holding the serialized search history.
pub const HISTORY_KEY: &str = "searchHistory";

/// Maximum number of suggestions returned by [`SearchEngine::get_suggestions`].
pub const MAX_SUGGESTIONS: usize = 5;

const TITLE_EXACT: f64 = 1.0;
const TITLE_CONTAINS: f64 = 0.8;
const TITLE_FUZZY_WEIGHT: f64 = 0.7;
const CONTENT_EXACT: f64 = 0.7;
const CONTENT_CONTAINS: f64 = 0.6;
const CONTENT_FUZZY_WEIGHT: f64 = 0.5;
const TAG_BONUS: f64 = 0.3;

/// Filters and ranks prompts, remembering recent queries.
///
/// The engine owns its [`SearchHistory`]. Loading and saving it are explicit
/// calls against a [`KeyValueStore`]; searching itself never touches storage.
///
/// # Examples
///
/// ```
/// use promptlib::PromptBuilder;
/// use promptlib::search::{SearchEngine, SearchOptions};
///
/// let prompts = vec![
///     PromptBuilder::new()
///         .id("1")
///         .title("Creative Writing")
///         .content("Write a story about dragons")
///         .build(),
///     PromptBuilder::new()
///         .id("2")
///         .title("Code Review")
///         .content("Explain this code")
///         .build(),
/// ];
///
/// let mut engine = SearchEngine::new();
/// let results = engine.search(&prompts, &SearchOptions::query("story"));
///
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].id.as_str(), "1");
/// assert_eq!(engine.history().recent(1), vec!["story"]);
/// ```
#[derive(Debug, Default)]
pub struct SearchEngine {
    history: SearchHistory,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine seeded with existing history.
    pub fn with_history(history: SearchHistory) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Searches `prompts` according to `options`.
    ///
    /// The query is recorded in history first. With neither a query nor
    /// tags, every prompt is returned in `sort_by` order. Otherwise prompts
    /// are filtered by creation date and by tags (a prompt must carry every
    /// requested tag), then scored against the query. Prompts scoring zero
    /// are dropped.
    pub fn search<'a>(
        &mut self,
        prompts: &'a [Prompt],
        options: &SearchOptions,
    ) -> Vec<&'a Prompt> {
        self.history.push(&options.query);

        if options.query.is_empty() && options.tags.is_empty() {
            let mut all: Vec<&Prompt> = prompts.iter().collect();
            options.sort_by.sort_prompts(&mut all);
            return all;
        }

        let mut filtered: Vec<&Prompt> = prompts
            .iter()
            .filter(|prompt| {
                options
                    .date_range
                    .is_none_or(|range| range.contains(prompt.created_at))
            })
            .filter(|prompt| options.tags.iter().all(|tag| prompt.has_tag(tag)))
            .collect();

        if options.query.is_empty() {
            options.sort_by.sort_prompts(&mut filtered);
            debug!(tags = ?options.tags, results = filtered.len(), "tag search completed");
            return filtered;
        }

        let query = options.query.to_lowercase();
        let mut scored: Vec<(&Prompt, f64)> = filtered
            .into_iter()
            .map(|prompt| (prompt, relevance_score(prompt, &query, options)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        let ranked: Vec<&Prompt> = match options.sort_by {
            SortBy::Relevance => {
                scored.sort_by(|a, b| b.1.total_cmp(&a.1));
                scored.into_iter().map(|(prompt, _)| prompt).collect()
            }
            sort_by => {
                let mut ranked: Vec<&Prompt> =
                    scored.into_iter().map(|(prompt, _)| prompt).collect();
                sort_by.sort_prompts(&mut ranked);
                ranked
            }
        };

        debug!(query = %options.query, results = ranked.len(), "search completed");
        ranked
    }

    /// Suggests completions for a partially typed query.
    ///
    /// Blank input yields the most recent history entries. Otherwise history
    /// entries containing the input come first, followed by prompt tags
    /// containing it, both case-insensitively. At most
    /// [`MAX_SUGGESTIONS`] are returned, without duplicates.
    pub fn get_suggestions(&self, input: &str, prompts: &[Prompt]) -> Vec<String> {
        if input.trim().is_empty() {
            return self.history.recent(MAX_SUGGESTIONS);
        }

        let needle = input.to_lowercase();
        let mut seen: HashSet<&str> = HashSet::new();
        let tags = prompts.iter().flat_map(|prompt| prompt.tags.iter().map(String::as_str));

        self.history
            .entries()
            .chain(tags)
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .filter(|candidate| seen.insert(*candidate))
            .take(MAX_SUGGESTIONS)
            .map(String::from)
            .collect()
    }

    /// Replaces the in-memory history with what the store holds.
    ///
    /// A missing key loads as empty history.
    pub fn load_history(
        &mut self,
        store: &dyn KeyValueStore,
    ) -> Result<&SearchHistory, PromptError> {
        self.history = read_json::<SearchHistory>(store, HISTORY_KEY)?.unwrap_or_default();
        Ok(&self.history)
    }

    /// Writes the current history to the store.
    pub fn save_history(&self, store: &dyn KeyValueStore) -> Result<(), PromptError> {
        write_json(store, HISTORY_KEY, &self.history)
    }

    /// Saves history without surfacing failures.
    ///
    /// History is a convenience; a failed write is logged and otherwise
    /// ignored so it can never fail the search that produced it.
    pub fn persist_history(&self, store: &dyn KeyValueStore) {
        if let Err(e) = self.save_history(store) {
            warn!(error = %e, "failed to persist search history");
        }
    }

    /// Empties the history and removes it from the store.
    pub fn clear_history(&mut self, store: &dyn KeyValueStore) -> Result<(), PromptError> {
        self.history.clear();
        store.remove(HISTORY_KEY)
    }
}

/// Scores a prompt against an already lowercased query, in `[0.0, 1.0]`.
fn relevance_score(prompt: &Prompt, query: &str, options: &SearchOptions) -> f64 {
    let mut score = 0.0;

    if options.search_in_title {
        let title = prompt.title.to_lowercase();
        if title == query {
            score += TITLE_EXACT;
        } else if title.contains(query) {
            score += TITLE_CONTAINS;
        } else if options.fuzzy_match {
            score += TITLE_FUZZY_WEIGHT * fuzzy_match(&title, query);
        }
    }

    if options.search_in_content {
        let content = prompt.content.to_lowercase();
        if content == query {
            score += CONTENT_EXACT;
        } else if content.contains(query) {
            score += CONTENT_CONTAINS;
        } else if options.fuzzy_match {
            score += CONTENT_FUZZY_WEIGHT * fuzzy_match(&content, query);
        }
    }

    if prompt.tags.iter().any(|tag| tag.to_lowercase() == query) {
        score += TAG_BONUS;
    }

    score.min(1.0)
}
