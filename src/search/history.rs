use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of queries remembered.
pub const MAX_HISTORY: usize = 10;

/// Recent search queries, most recent first.
///
/// Holds at most [`MAX_HISTORY`] entries with no duplicates. Re-issuing a
/// query moves it to the front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SearchHistory {
    entries: VecDeque<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a query. Blank queries are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptlib::search::SearchHistory;
    ///
    /// let mut history = SearchHistory::new();
    /// history.push("rust");
    /// history.push("story");
    /// history.push("rust");
    ///
    /// assert_eq!(history.entries().collect::<Vec<_>>(), vec!["rust", "story"]);
    /// ```
    pub fn push(&mut self, query: &str) {
        if query.trim().is_empty() {
            return;
        }

        self.entries.retain(|entry| entry != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(MAX_HISTORY);
    }

    /// Iterates entries from most to least recent.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Returns up to `n` of the most recent entries.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.entries.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl From<Vec<String>> for SearchHistory {
    /// Rebuilds history from a stored list, most recent first.
    ///
    /// Stored data is re-validated: blanks and later duplicates are dropped
    /// and the list is capped.
    fn from(stored: Vec<String>) -> Self {
        let mut history = Self::new();
        for query in stored.iter().rev() {
            history.push(query);
        }
        history
    }
}

impl From<SearchHistory> for Vec<String> {
    fn from(history: SearchHistory) -> Self {
        history.entries.into()
    }
}
