use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Common English function words dropped before keyword counting.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "because", "as", "what", "which", "this", "that",
    "these", "those", "then", "just", "so", "than", "such", "both", "through", "about", "for",
    "is", "of", "while", "during", "to", "from", "in", "out", "on", "off", "over", "under",
    "again", "further", "once", "here", "there", "when", "where", "why", "how", "all", "any",
    "each", "few", "more", "most", "other", "some", "no", "nor", "not", "only", "own", "same",
    "too", "very", "can", "will", "should", "now", "been", "being", "have", "has", "had", "did",
    "does", "do", "doing", "am", "are", "was", "were", "be", "by", "with",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Tokens must be strictly longer than this many characters.
const MIN_TOKEN_CHARS: usize = 2;

/// Word tokenizer shared by every analysis function.
///
/// Text is lowercased, every character that is not an ASCII letter or digit
/// becomes a space, and the result is split on whitespace. Accented letters
/// therefore split words. Tokens of two characters
/// or fewer are discarded.
pub struct Tokenizer;

impl Tokenizer {
    /// Splits text into lowercase words, keeping stopwords.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptlib::nlp::Tokenizer;
    ///
    /// assert_eq!(Tokenizer::words("It's a GREAT day!"), vec!["great", "day"]);
    /// ```
    pub fn words(text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
            .collect();

        cleaned
            .split_whitespace()
            .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
            .map(String::from)
            .collect()
    }

    /// Splits text into lowercase content words, dropping stopwords.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptlib::nlp::Tokenizer;
    ///
    /// assert_eq!(
    ///     Tokenizer::tokenize("Write a story about the dragons"),
    ///     vec!["write", "story", "dragons"]
    /// );
    /// assert!(Tokenizer::tokenize("").is_empty());
    /// ```
    pub fn tokenize(text: &str) -> Vec<String> {
        Self::words(text)
            .into_iter()
            .filter(|word| !Self::is_stopword(word))
            .collect()
    }

    /// Returns true if the (already lowercased) word is a stopword.
    pub fn is_stopword(word: &str) -> bool {
        STOPWORD_SET.contains(word)
    }
}
