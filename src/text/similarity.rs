//! Word-overlap similarity between sentences.

use std::collections::HashSet;

/// Lower-cased word tokens with surrounding punctuation stripped.
pub fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Jaccard similarity of two token sets: |A ∩ B| / |A ∪ B|.
///
/// Two token-less inputs have similarity 0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f32 / union as f32
}

/// Jaccard similarity of the word sets of two sentences.
pub fn jaccard_similarity(a: &str, b: &str) -> f32 {
    jaccard(&word_set(a), &word_set(b))
}
