use std::path::PathBuf;

use crate::nlp::{DEFAULT_KEYWORD_LIMIT, DEFAULT_SIMILAR_LIMIT, DEFAULT_TAG_LIMIT};

/// Runtime configuration for the CLI.
///
/// Parsed from environment variables with fallback defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Explicit database path. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Keywords shown by `analyze` (default 5).
    pub keyword_limit: usize,
    /// Tags suggested by `analyze` and `add --suggest` (default 3).
    pub tag_limit: usize,
    /// Prompts listed by `similar` (default 3).
    pub similar_limit: usize,
    /// Default for fuzzy matching in `search` (default true).
    pub fuzzy_match: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            tag_limit: DEFAULT_TAG_LIMIT,
            similar_limit: DEFAULT_SIMILAR_LIMIT,
            fuzzy_match: true,
        }
    }
}

impl Config {
    /// Parses configuration from environment variables.
    ///
    /// Falls back to defaults when env vars are not set or invalid.
    ///
    /// # Environment Variables
    ///
    /// - `PROMPTLIB_DB` (path): Database file location
    /// - `PROMPTLIB_KEYWORD_LIMIT` (usize, default 5)
    /// - `PROMPTLIB_TAG_LIMIT` (usize, default 3)
    /// - `PROMPTLIB_SIMILAR_LIMIT` (usize, default 3)
    /// - `PROMPTLIB_FUZZY` (bool, default true)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database_path = std::env::var_os("PROMPTLIB_DB")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self {
            database_path,
            keyword_limit: env_parse("PROMPTLIB_KEYWORD_LIMIT").unwrap_or(defaults.keyword_limit),
            tag_limit: env_parse("PROMPTLIB_TAG_LIMIT").unwrap_or(defaults.tag_limit),
            similar_limit: env_parse("PROMPTLIB_SIMILAR_LIMIT").unwrap_or(defaults.similar_limit),
            fuzzy_match: env_parse("PROMPTLIB_FUZZY").unwrap_or(defaults.fuzzy_match),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
