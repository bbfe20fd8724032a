/// Similarity at or below this is reported as no match.
pub const FUZZY_THRESHOLD: f64 = 0.5;

const SUBSTRING_SCORE: f64 = 0.9;

/// Calculates the Levenshtein distance between two strings.
///
/// Insertions, deletions and substitutions all cost 1. Operates on
/// characters, not bytes.
///
/// # Examples
///
/// ```
/// use promptlib::search::levenshtein_distance;
///
/// assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
/// assert_eq!(levenshtein_distance("", "abc"), 3);
/// ```
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    let mut matrix = vec![vec![0usize; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = usize::from(s1_chars[i - 1] != s2_chars[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[len1][len2]
}

/// Scores how well `query` approximately matches `text`, case-insensitively.
///
/// - identical strings score 1.0
/// - `text` containing `query` scores 0.9
/// - otherwise `1 - distance / max_len`, but only when that exceeds 0.5
///
/// Anything else, including an empty query, scores 0.0.
///
/// # Examples
///
/// ```
/// use promptlib::search::fuzzy_match;
///
/// assert_eq!(fuzzy_match("hello world", "hello"), 0.9);
/// assert_eq!(fuzzy_match("abc", "xyz"), 0.0);
/// ```
pub fn fuzzy_match(text: &str, query: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }

    let text = text.to_lowercase();
    let query = query.to_lowercase();

    if text == query {
        return 1.0;
    }
    if text.contains(&query) {
        return SUBSTRING_SCORE;
    }

    let distance = levenshtein_distance(&text, &query);
    let max_len = text.chars().count().max(query.chars().count());
    let similarity = 1.0 - distance as f64 / max_len as f64;

    if similarity > FUZZY_THRESHOLD {
        similarity
    } else {
        0.0
    }
}
