use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Tokenizer;

/// Number of keywords returned when the caller has no preference.
pub const DEFAULT_KEYWORD_LIMIT: usize = 5;

/// A content word and how often it occurs in the analysed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub score: usize,
}

/// Extracts the most frequent content words from text.
///
/// Words are ranked by descending frequency. Words with equal frequency keep
/// the order in which they first appear in the text.
///
/// # Examples
///
/// ```
/// use promptlib::nlp::extract_keywords;
///
/// let keywords = extract_keywords("rust code, more rust code, rust", 2);
/// assert_eq!(keywords[0].text, "rust");
/// assert_eq!(keywords[0].score, 3);
/// assert_eq!(keywords[1].text, "code");
/// ```
pub fn extract_keywords(text: &str, limit: usize) -> Vec<Keyword> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut keywords: Vec<Keyword> = Vec::new();

    for word in Tokenizer::tokenize(text) {
        match index.get(&word) {
            Some(&i) => keywords[i].score += 1,
            None => {
                index.insert(word.clone(), keywords.len());
                keywords.push(Keyword {
                    text: word,
                    score: 1,
                });
            }
        }
    }

    // Stable sort keeps first-occurrence order among ties
    keywords.sort_by(|a, b| b.score.cmp(&a.score));
    keywords.truncate(limit);
    keywords
}
