use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What a prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Question,
    Instruction,
    Conversation,
    Creative,
    Analysis,
    General,
}

impl Intent {
    /// Returns the lowercase category name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Instruction => "instruction",
            Self::Conversation => "conversation",
            Self::Creative => "creative",
            Self::Analysis => "analysis",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pattern table, checked in order. The first matching category wins.
const INTENT_PATTERNS: &[(Intent, &[&str])] = &[
    (
        Intent::Question,
        &[
            r"\?$",
            r"^(what|how|why|when|where|who|which|can|could|would|will|is|are|was|were|do|does|did)",
        ],
    ),
    (
        Intent::Instruction,
        &[
            r"^(write|create|generate|develop|build|make|implement|design|explain|describe|list|enumerate|outline|summarize)",
        ],
    ),
    (
        Intent::Conversation,
        &[
            r"^(hi|hello|hey|greetings|good morning|good afternoon|good evening)",
            r"(let's talk|let's discuss|can we discuss|what do you think about|your thoughts on)",
        ],
    ),
    (
        Intent::Creative,
        &[
            r"(imagine|pretend|suppose|what if|create a story|write a poem|invent|fiction|fantasy|scenario)",
        ],
    ),
    (
        Intent::Analysis,
        &[r"(analyze|assess|evaluate|examine|investigate|review|critique|compare|contrast)"],
    ),
];

static INTENT_RULES: Lazy<Vec<(Intent, Vec<Regex>)>> = Lazy::new(|| {
    INTENT_PATTERNS
        .iter()
        .map(|(intent, patterns)| {
            let compiled = patterns
                .iter()
                .map(|pattern| Regex::new(pattern).expect("intent pattern is valid"))
                .collect();
            (*intent, compiled)
        })
        .collect()
});

/// Classifies the intent of a prompt.
///
/// Categories are tried in a fixed order (question, instruction,
/// conversation, creative, analysis) against the lowercased text, and the
/// first one with a matching pattern is returned. This is first-match, not
/// best-match: "Write a poem?" is a question.
///
/// # Examples
///
/// ```
/// use promptlib::nlp::{categorize_intent, Intent};
///
/// assert_eq!(categorize_intent("Explain this code"), Intent::Instruction);
/// assert_eq!(categorize_intent("Explain this code?"), Intent::Question);
/// assert_eq!(categorize_intent(""), Intent::General);
/// ```
pub fn categorize_intent(text: &str) -> Intent {
    if text.is_empty() {
        return Intent::General;
    }

    let normalized = text.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|pattern| pattern.is_match(&normalized)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::General)
}
