//! Sentence importance scoring.

use serde::{Deserialize, Serialize};

use crate::model::SentenceAnalysis;

/// Weights of the importance components. They should sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight of polar sentiment (positive + negative)
    pub sentiment: f32,
    /// Weight of key phrases per word
    pub key_phrase: f32,
    /// Weight of entities per word
    pub entity: f32,
}

impl ScoringWeights {
    /// Create weights.
    pub fn new(sentiment: f32, key_phrase: f32, entity: f32) -> Self {
        Self {
            sentiment,
            key_phrase,
            entity,
        }
    }

    pub fn sum(&self) -> f32 {
        self.sentiment + self.key_phrase + self.entity
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::new(0.1, 0.5, 0.4)
    }
}

/// Multipliers applied on top of the weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionBoosts {
    pub first_sentence: f32,
    pub last_sentence: f32,
    /// Applied when the sentence contains a digit
    pub numeric: f32,
}

impl Default for PositionBoosts {
    fn default() -> Self {
        Self {
            first_sentence: 1.5,
            last_sentence: 1.2,
            numeric: 1.1,
        }
    }
}

/// Importance of `analysis` within a document of `total` sentences.
///
/// Never negative for non-negative weights; a sentence with no words, no
/// phrases and no entities scores only its sentiment component.
pub fn importance_score(
    analysis: &SentenceAnalysis,
    total: usize,
    weights: &ScoringWeights,
    boosts: &PositionBoosts,
) -> f32 {
    let words = analysis.word_count();
    let per_word = |count: usize| {
        if words == 0 {
            0.0
        } else {
            count as f32 / words as f32
        }
    };

    let mut score = weights.sentiment * analysis.sentiment_score.polarity()
        + weights.key_phrase * per_word(analysis.key_phrases.len())
        + weights.entity * per_word(analysis.entities.len());

    if analysis.index == 0 {
        score *= boosts.first_sentence;
    }
    if total > 1 && analysis.index + 1 == total {
        score *= boosts.last_sentence;
    }
    if analysis.has_digit() {
        score *= boosts.numeric;
    }

    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SentimentScore;

    fn sentence(index: usize, text: &str, phrases: usize, entities: usize) -> SentenceAnalysis {
        let mut a = SentenceAnalysis::neutral(index, text, SentimentScore::zero_signal());
        a.key_phrases = vec!["p".to_string(); phrases];
        a.entities = vec!["e".to_string(); entities];
        a
    }

    #[test]
    fn test_weighted_sum() {
        let a = sentence(1, "one two three four", 2, 1);
        let score = importance_score(&a, 3, &ScoringWeights::default(), &PositionBoosts::default());
        // 0.5 * 2/4 + 0.4 * 1/4
        assert!((score - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_positional_and_numeric_boosts() {
        let weights = ScoringWeights::default();
        let boosts = PositionBoosts::default();
        let base = importance_score(&sentence(1, "a b", 1, 0), 3, &weights, &boosts);
        let first = importance_score(&sentence(0, "a b", 1, 0), 3, &weights, &boosts);
        let last = importance_score(&sentence(2, "a b", 1, 0), 3, &weights, &boosts);
        let numeric = importance_score(&sentence(1, "a 5", 1, 0), 3, &weights, &boosts);
        assert!((first - base * 1.5).abs() < 1e-6);
        assert!((last - base * 1.2).abs() < 1e-6);
        assert!((numeric - base * 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_zero_signal_sentence_scores_zero() {
        let a = sentence(1, "Nothing notable here.", 0, 0);
        let score = importance_score(&a, 3, &ScoringWeights::default(), &PositionBoosts::default());
        assert!(score.is_finite());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_empty_text_has_no_division_by_zero() {
        let a = sentence(0, "", 3, 3);
        let score = importance_score(&a, 1, &ScoringWeights::default(), &PositionBoosts::default());
        assert_eq!(score, 0.0);
    }
}
