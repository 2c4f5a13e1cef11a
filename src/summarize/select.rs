//! Top-K selection, near-duplicate removal and summary assembly.

use crate::model::SentenceAnalysis;
use crate::text::{is_terminator, jaccard, word_set};

/// Indices of the `k` highest-scoring sentences, in document order.
///
/// Equal scores rank the earlier sentence first.
pub fn select_top(analyses: &[SentenceAnalysis], k: usize) -> Vec<usize> {
    let mut ranked: Vec<&SentenceAnalysis> = analyses.iter().collect();
    ranked.sort_by(|a, b| {
        b.importance_score
            .total_cmp(&a.importance_score)
            .then(a.index.cmp(&b.index))
    });

    let mut selected: Vec<usize> = ranked.into_iter().take(k).map(|a| a.index).collect();
    selected.sort_unstable();
    selected
}

/// Drop sentences too similar to one already kept.
///
/// Walks `sentences` in order and keeps one only if its similarity to every
/// kept sentence is below `threshold`.
pub fn remove_near_duplicates<'a>(sentences: &[&'a str], threshold: f32) -> Vec<&'a str> {
    let mut kept: Vec<(&str, _)> = Vec::new();
    for &sentence in sentences {
        let words = word_set(sentence);
        let duplicate = kept
            .iter()
            .any(|(_, other)| jaccard(&words, other) >= threshold);
        if duplicate {
            log::debug!("Summarizer: dropped near-duplicate {:?}", sentence);
            continue;
        }
        kept.push((sentence, words));
    }
    kept.into_iter().map(|(s, _)| s).collect()
}

/// Join sentences into one summary ending in a terminator.
///
/// Sentences are kept verbatim, so an ellipsis such as `"Wait..."` survives.
/// A sentence without its own terminator gets a single period. A sentence
/// ending in `?` or `!` keeps that mark and gets no period, which means a
/// summary can end in `?` or `!`. Sentences are separated by one space, so
/// joining never creates a doubled period.
pub fn join_summary(sentences: &[&str]) -> String {
    let mut summary = String::new();
    for sentence in sentences {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        if !summary.is_empty() {
            summary.push(' ');
        }
        summary.push_str(sentence);
        if !sentence.ends_with(is_terminator) {
            summary.push('.');
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SentimentScore;

    fn scored(scores: &[f32]) -> Vec<SentenceAnalysis> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let mut a = SentenceAnalysis::neutral(i, format!("s{i}"), SentimentScore::zero_signal());
                a.importance_score = s;
                a
            })
            .collect()
    }

    #[test]
    fn test_select_top_restores_document_order() {
        let analyses = scored(&[0.1, 0.9, 0.3, 0.8]);
        assert_eq!(select_top(&analyses, 2), vec![1, 3]);
        assert_eq!(select_top(&analyses, 10), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_select_top_ties_prefer_earlier() {
        let analyses = scored(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(select_top(&analyses, 2), vec![0, 1]);
    }

    #[test]
    fn test_near_duplicates_removed() {
        let kept = remove_near_duplicates(
            &["The cat sat on the mat.", "The cat sat on a mat.", "Dogs bark."],
            0.55,
        );
        assert_eq!(kept, vec!["The cat sat on the mat.", "Dogs bark."]);
    }

    #[test]
    fn test_below_threshold_kept() {
        // 2 shared of 4 distinct words
        let kept = remove_near_duplicates(&["It works well.", "It works fine."], 0.55);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_join_summary_periods() {
        assert_eq!(join_summary(&["First.", "Second", "Third!"]), "First. Second. Third!");
        assert_eq!(join_summary(&["Only"]), "Only.");
        assert_eq!(join_summary(&["  Padded.  ", "   "]), "Padded.");
        assert_eq!(join_summary(&[]), "");
    }

    #[test]
    fn test_join_summary_keeps_sentences_verbatim() {
        assert_eq!(join_summary(&["Wait..."]), "Wait...");
        assert_eq!(
            join_summary(&["It rose.", "Why did it rise?"]),
            "It rose. Why did it rise?"
        );
        assert!(!join_summary(&["One.", "Two.", "Three"]).contains(".."));
    }
}
