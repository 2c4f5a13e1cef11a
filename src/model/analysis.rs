//! Per-sentence analysis types.

use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Dominant sentiment label of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
    Mixed,
}

/// Confidence per sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScore {
    pub positive: f32,
    pub negative: f32,
    pub neutral: f32,
    pub mixed: f32,
}

impl SentimentScore {
    /// Scores for text that carries no signal at all.
    pub fn zero_signal() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            mixed: 0.0,
        }
    }

    /// Scores substituted when the backend failed.
    pub fn balanced() -> Self {
        Self {
            positive: 0.5,
            negative: 0.5,
            neutral: 0.5,
            mixed: 0.0,
        }
    }

    /// Strength of polar (non-neutral) sentiment.
    pub fn polarity(&self) -> f32 {
        self.positive + self.negative
    }
}

/// Sentiment response from the language service.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: Sentiment,
    pub scores: SentimentScore,
}

/// Features of one sentence used for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceAnalysis {
    /// Position of the sentence in the document
    pub index: usize,
    pub text: String,
    pub sentiment: Sentiment,
    pub sentiment_score: SentimentScore,
    pub key_phrases: Vec<String>,
    pub entities: Vec<String>,
    /// Set once by the summarizer
    pub importance_score: f32,
}

impl SentenceAnalysis {
    /// Neutral analysis with no phrases or entities.
    pub fn neutral(index: usize, text: impl Into<String>, scores: SentimentScore) -> Self {
        Self {
            index,
            text: text.into(),
            sentiment: Sentiment::Neutral,
            sentiment_score: scores,
            key_phrases: Vec::new(),
            entities: Vec::new(),
            importance_score: 0.0,
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the sentence contains a decimal digit.
    pub fn has_digit(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_digit())
    }
}

/// How a [`SentenceAnalysis`] came to be.
///
/// Keeps "the backend answered and the sentence is neutral" apart from
/// "the backend failed and a neutral analysis was substituted".
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The backend answered all three calls.
    Analyzed(SentenceAnalysis),
    /// Blank sentence; no backend call was made.
    Blank(SentenceAnalysis),
    /// A backend call failed; a neutral analysis stands in.
    Fallback {
        analysis: SentenceAnalysis,
        cause: BackendError,
    },
}

impl AnalysisOutcome {
    /// Borrow the analysis regardless of how it was produced.
    pub fn analysis(&self) -> &SentenceAnalysis {
        match self {
            AnalysisOutcome::Analyzed(a) | AnalysisOutcome::Blank(a) => a,
            AnalysisOutcome::Fallback { analysis, .. } => analysis,
        }
    }

    /// Take the analysis regardless of how it was produced.
    pub fn into_analysis(self) -> SentenceAnalysis {
        match self {
            AnalysisOutcome::Analyzed(a) | AnalysisOutcome::Blank(a) => a,
            AnalysisOutcome::Fallback { analysis, .. } => analysis,
        }
    }

    /// Whether a neutral analysis was substituted for a failed call.
    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisOutcome::Fallback { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_and_digits() {
        let a = SentenceAnalysis::neutral(0, "Revenue grew 12% in 2023.", SentimentScore::zero_signal());
        assert_eq!(a.word_count(), 5);
        assert!(a.has_digit());

        let b = SentenceAnalysis::neutral(1, "No numbers here.", SentimentScore::zero_signal());
        assert!(!b.has_digit());
    }

    #[test]
    fn test_outcome_accessors() {
        let analysis = SentenceAnalysis::neutral(2, "Hi.", SentimentScore::balanced());
        let outcome = AnalysisOutcome::Fallback {
            analysis: analysis.clone(),
            cause: BackendError::Throttled("busy".into()),
        };
        assert!(outcome.is_fallback());
        assert_eq!(outcome.analysis().index, 2);
        assert_eq!(outcome.into_analysis(), analysis);

        let ok = AnalysisOutcome::Analyzed(SentenceAnalysis::neutral(0, "x", SentimentScore::zero_signal()));
        assert!(!ok.is_fallback());
    }

    #[test]
    fn test_sentiment_serializes_uppercase() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"NEGATIVE\"");
    }
}
