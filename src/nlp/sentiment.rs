use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::Tokenizer;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "best", "better", "excellent", "amazing", "wonderful", "fantastic",
    "positive", "helpful", "beneficial", "success", "successful", "effective", "efficient",
    "optimal", "improve", "improvement", "advantage", "innovative", "creative", "engaging",
    "valuable", "useful", "insightful", "inspiring", "enjoy", "happy", "love", "like",
    "recommend",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "worst", "worse", "terrible", "awful", "horrible", "poor", "negative", "difficult",
    "challenging", "problem", "issue", "fault", "fail", "failure", "ineffective", "inefficient",
    "disadvantage", "drawback", "downside", "risk", "critical", "criticize", "hate", "dislike",
    "avoid", "struggle", "frustrating", "annoying", "useless", "waste",
];

const NEUTRAL_WORDS: &[&str] = &[
    "neutral", "balanced", "objective", "impartial", "fair", "moderate", "average", "standard",
    "normal", "regular", "ordinary", "typical", "common", "general", "basic", "simple", "plain",
    "middle", "medium", "intermediate", "conventional", "traditional", "usual", "customary",
    "routine", "expected",
];

static POSITIVE: Lazy<HashSet<&'static str>> =
    Lazy::new(|| POSITIVE_WORDS.iter().copied().collect());
static NEGATIVE: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NEGATIVE_WORDS.iter().copied().collect());
static NEUTRAL: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NEUTRAL_WORDS.iter().copied().collect());

/// Scores above this are positive, below its negation negative.
const POLARITY_THRESHOLD: f64 = 0.1;

/// Overall polarity of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Raw lexicon hit counts behind a sentiment score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Result of [`analyze_sentiment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment: Sentiment,
    /// Polarity in `[-1.0, 1.0]`.
    pub score: f64,
    /// Lexicon hit counts; absent when no sentiment word was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<SentimentCounts>,
}

impl SentimentAnalysis {
    fn neutral() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            score: 0.0,
            details: None,
        }
    }
}

/// Classifies the polarity of text by lexicon lookup.
///
/// Every word (stopwords included) is checked against fixed positive,
/// negative and neutral word lists. The score is
/// `(positive - negative) / (positive + negative + neutral)`.
///
/// # Examples
///
/// ```
/// use promptlib::nlp::{analyze_sentiment, Sentiment};
///
/// let result = analyze_sentiment("great, excellent");
/// assert_eq!(result.sentiment, Sentiment::Positive);
/// assert_eq!(result.score, 1.0);
///
/// assert_eq!(analyze_sentiment("").sentiment, Sentiment::Neutral);
/// ```
pub fn analyze_sentiment(text: &str) -> SentimentAnalysis {
    let mut counts = SentimentCounts::default();

    for word in Tokenizer::words(text) {
        let word = word.as_str();
        if POSITIVE.contains(word) {
            counts.positive += 1;
        } else if NEGATIVE.contains(word) {
            counts.negative += 1;
        } else if NEUTRAL.contains(word) {
            counts.neutral += 1;
        }
    }

    let total = counts.total();
    if total == 0 {
        return SentimentAnalysis::neutral();
    }

    let score = (counts.positive as f64 - counts.negative as f64) / total as f64;
    let sentiment = if score > POLARITY_THRESHOLD {
        Sentiment::Positive
    } else if score < -POLARITY_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    SentimentAnalysis {
        sentiment,
        score,
        details: Some(counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_neutral_without_details() {
        let result = analyze_sentiment("");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details, None);
    }

    #[test]
    fn text_without_lexicon_words_is_neutral() {
        let result = analyze_sentiment("dragons and castles");
        assert_eq!(result, SentimentAnalysis::neutral());
    }

    #[test]
    fn only_positive_words_score_one() {
        let result = analyze_sentiment("great excellent");
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.score, 1.0);
        assert_eq!(
            result.details,
            Some(SentimentCounts {
                positive: 2,
                negative: 0,
                neutral: 0
            })
        );
    }

    #[test]
    fn negative_text_scores_below_threshold() {
        let result = analyze_sentiment("This is a terrible, awful problem");
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.score, -1.0);
    }

    #[test]
    fn neutral_words_dilute_score() {
        // (1 - 0) / (1 + 0 + 9) = 0.1, which is not above the threshold
        let text = "good standard normal regular basic simple plain usual typical common";
        let result = analyze_sentiment(text);
        assert!((result.score - 0.1).abs() < 1e-9);
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn balanced_text_is_neutral() {
        let result = analyze_sentiment("good but bad");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!(result.details.is_some());
    }

    #[test]
    fn serializes_lowercase_label() {
        let json = serde_json::to_value(analyze_sentiment("love it")).unwrap();
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(json["details"]["positive"], 1);
    }
}
