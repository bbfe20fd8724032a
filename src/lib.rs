//! A local prompt library with lightweight text heuristics.
//!
//! The [`nlp`] module holds the analysis functions (keywords, topic tags,
//! sentiment, intent, similarity) and [`search`] the ranked search engine.
//! [`PromptService`] ties both to a [`Database`]-backed prompt store.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod nlp;
pub mod search;
pub mod service;
pub mod store;
pub mod utils;

pub use config::Config;
pub use db::Database;
pub use error::PromptError;
pub use models::{Prompt, PromptBuilder, PromptId};
pub use search::{SearchEngine, SearchOptions, SortBy};
pub use service::{ImportReport, PromptService, PromptUpdate};
pub use store::{KeyValueStore, MemoryStore};
