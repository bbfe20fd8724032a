use super::extract_keywords;

/// Number of topic tags suggested when the caller has no preference.
pub const DEFAULT_TAG_LIMIT: usize = 3;

/// How many keywords feed into topic scoring.
const TAG_KEYWORD_POOL: usize = 10;

/// Weight applied to a keyword that only partially matches a topic word.
const PARTIAL_MATCH_WEIGHT: f64 = 0.5;

/// Fixed topic taxonomy used for tag suggestions, in tie-break order.
pub const TOPICS: &[(&str, &[&str])] = &[
    (
        "writing",
        &[
            "write", "story", "essay", "blog", "content", "article", "script", "narrative",
            "poem", "poetry", "fiction", "author",
        ],
    ),
    (
        "programming",
        &[
            "code", "function", "algorithm", "programming", "developer", "software", "app",
            "application", "debug", "framework", "library",
        ],
    ),
    (
        "education",
        &[
            "learn", "explain", "teacher", "student", "course", "curriculum", "education",
            "school", "teach", "lesson", "study",
        ],
    ),
    (
        "business",
        &[
            "business", "marketing", "strategy", "company", "enterprise", "startup", "product",
            "service", "customer", "client", "sales",
        ],
    ),
    (
        "research",
        &[
            "research", "analysis", "study", "investigate", "examine", "explore", "findings",
            "data", "results", "evidence", "hypothesis",
        ],
    ),
    (
        "creative",
        &[
            "creative", "imagine", "invent", "design", "artwork", "visual", "concept",
            "innovation", "generate", "novel", "original",
        ],
    ),
    (
        "social",
        &[
            "social", "media", "communication", "interact", "community", "network",
            "engagement", "audience", "followers", "platform",
        ],
    ),
    (
        "personal",
        &[
            "personal", "self", "improvement", "goal", "habit", "lifestyle", "wellness",
            "productivity", "motivation",
        ],
    ),
    (
        "technical",
        &[
            "technical", "technology", "engineering", "system", "device", "hardware",
            "software", "mechanism", "infrastructure",
        ],
    ),
];

/// Scores every topic against the top keywords of `text`.
///
/// A keyword that is one of a topic's words adds its frequency to that topic.
/// Otherwise it adds half its frequency once for every topic word that
/// contains it or is contained in it, so a keyword can count several times
/// toward the same topic.
///
/// Topics with a non-positive score are omitted. The result is sorted by
/// descending score, ties in taxonomy order.
pub fn score_topics(text: &str) -> Vec<(&'static str, f64)> {
    let keywords = extract_keywords(text, TAG_KEYWORD_POOL);
    let mut scores: Vec<(&'static str, f64)> =
        TOPICS.iter().map(|(topic, _)| (*topic, 0.0)).collect();

    for keyword in &keywords {
        let weight = keyword.score as f64;
        let word = keyword.text.as_str();

        for ((_, topic_words), (_, score)) in TOPICS.iter().zip(scores.iter_mut()) {
            if topic_words.contains(&word) {
                *score += weight;
            } else {
                let partial_hits = topic_words
                    .iter()
                    .filter(|topic_word| topic_word.contains(word) || word.contains(*topic_word))
                    .count();
                *score += PARTIAL_MATCH_WEIGHT * weight * partial_hits as f64;
            }
        }
    }

    scores.retain(|(_, score)| *score > 0.0);
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    scores
}

/// Suggests up to `limit` topic names for a piece of text.
///
/// # Examples
///
/// ```
/// use promptlib::nlp::suggest_tags;
///
/// assert_eq!(suggest_tags("Write a short story about a hero", 1), vec!["writing"]);
/// assert!(suggest_tags("", 3).is_empty());
/// ```
pub fn suggest_tags(text: &str, limit: usize) -> Vec<String> {
    score_topics(text)
        .into_iter()
        .take(limit)
        .map(|(topic, _)| topic.to_string())
        .collect()
}
