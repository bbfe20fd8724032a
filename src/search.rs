//! Prompt search: filtering, relevance scoring, fuzzy matching and query
//! history.

mod engine;
mod fuzzy;
mod history;
mod options;

pub use engine::{HISTORY_KEY, MAX_SUGGESTIONS, SearchEngine};
pub use fuzzy::{FUZZY_THRESHOLD, fuzzy_match, levenshtein_distance};
pub use history::{MAX_HISTORY, SearchHistory};
pub use options::{DateRange, SearchOptions, SortBy};
