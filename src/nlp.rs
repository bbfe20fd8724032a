//! Text heuristics for prompts: keywords, topic tags, sentiment, intent and
//! similarity.
//!
//! Everything here is a pure function over plain strings and [`Prompt`]
//! slices. Lexicons and patterns are static tables built on first use.
//!
//! # Examples
//!
//! ```
//! use promptlib::nlp::{self, Intent, Sentiment};
//!
//! let text = "Write a short story about a hero";
//!
//! assert_eq!(nlp::suggest_tags(text, 1), vec!["writing"]);
//! assert_eq!(nlp::categorize_intent(text), Intent::Instruction);
//! assert_eq!(nlp::analyze_sentiment(text).sentiment, Sentiment::Neutral);
//! ```

mod intent;
mod keywords;
mod normalizer;
mod sentiment;
mod similarity;
mod tags;
mod tokenizer;

use serde::Serialize;

pub use intent::{Intent, categorize_intent};
pub use keywords::{DEFAULT_KEYWORD_LIMIT, Keyword, extract_keywords};
pub use normalizer::TagNormalizer;
pub use sentiment::{Sentiment, SentimentAnalysis, SentimentCounts, analyze_sentiment};
pub use similarity::{
    DEFAULT_SIMILAR_LIMIT, SimilarPrompt, find_similar_prompts, jaccard_similarity,
};
pub use tags::{DEFAULT_TAG_LIMIT, TOPICS, score_topics, suggest_tags};
pub use tokenizer::Tokenizer;

use crate::Prompt;

/// Every heuristic applied to a single prompt at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnalysis {
    pub keywords: Vec<Keyword>,
    pub suggested_tags: Vec<String>,
    pub sentiment: SentimentAnalysis,
    pub intent: Intent,
}

impl PromptAnalysis {
    /// Analyses a prompt's title and content.
    ///
    /// Intent is classified on the content alone, since titles are rarely
    /// phrased as requests.
    pub fn of(prompt: &Prompt, keyword_limit: usize, tag_limit: usize) -> Self {
        let text = prompt.searchable_text();
        Self {
            keywords: extract_keywords(&text, keyword_limit),
            suggested_tags: suggest_tags(&text, tag_limit),
            sentiment: analyze_sentiment(&text),
            intent: categorize_intent(&prompt.content),
        }
    }
}
