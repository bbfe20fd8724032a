//! Keyword and tag overlap between prompts.

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

use super::extract_keywords;
use crate::Prompt;

/// Number of similar prompts returned when the caller has no preference.
pub const DEFAULT_SIMILAR_LIMIT: usize = 3;

/// Keywords compared per prompt.
const SIMILARITY_KEYWORD_POOL: usize = 20;

const KEYWORD_WEIGHT: f64 = 0.7;
const TAG_WEIGHT: f64 = 0.3;

/// Prompts at or below this weighted similarity are not reported.
const MIN_SIMILARITY: f64 = 0.1;

/// A prompt paired with its similarity to some target prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPrompt<'a> {
    pub prompt: &'a Prompt,
    /// Weighted similarity in `[0.0, 1.0]`.
    pub similarity: f64,
}

/// Calculates Jaccard similarity between two sets.
///
/// Returns `|a ∩ b| / |a ∪ b|`, or 0.0 when both sets are empty.
///
/// # Examples
///
/// ```
/// use promptlib::nlp::jaccard_similarity;
/// use std::collections::HashSet;
///
/// let a: HashSet<&str> = ["rust", "async", "tokio"].into_iter().collect();
/// let b: HashSet<&str> = ["rust", "async", "concurrency"].into_iter().collect();
/// assert_eq!(jaccard_similarity(&a, &b), 0.5);
///
/// let empty: HashSet<&str> = HashSet::new();
/// assert_eq!(jaccard_similarity(&empty, &empty), 0.0);
/// ```
pub fn jaccard_similarity<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

fn keyword_set(prompt: &Prompt) -> HashSet<String> {
    extract_keywords(&prompt.searchable_text(), SIMILARITY_KEYWORD_POOL)
        .into_iter()
        .map(|keyword| keyword.text)
        .collect()
}

fn tag_set(prompt: &Prompt) -> HashSet<&str> {
    prompt.tags.iter().map(String::as_str).collect()
}

/// Finds the prompts most similar to `target`.
///
/// Similarity is `0.7 * keyword_jaccard + 0.3 * tag_jaccard`, where keywords
/// are the top 20 of each prompt's title and content. The target itself
/// (matched by id) is never returned. Results above 0.1 are sorted by
/// descending similarity and truncated to `limit`.
pub fn find_similar_prompts<'a>(
    target: &Prompt,
    prompts: &'a [Prompt],
    limit: usize,
) -> Vec<SimilarPrompt<'a>> {
    let target_keywords = keyword_set(target);
    let target_tags = tag_set(target);

    let mut similar: Vec<SimilarPrompt<'a>> = prompts
        .iter()
        .filter(|prompt| prompt.id != target.id)
        .map(|prompt| {
            let keyword_similarity = jaccard_similarity(&target_keywords, &keyword_set(prompt));
            let tag_similarity = jaccard_similarity(&target_tags, &tag_set(prompt));

            SimilarPrompt {
                prompt,
                similarity: KEYWORD_WEIGHT * keyword_similarity + TAG_WEIGHT * tag_similarity,
            }
        })
        .filter(|candidate| candidate.similarity > MIN_SIMILARITY)
        .collect();

    similar.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    similar.truncate(limit);
    similar
}
