//! Per-sentence feature extraction through the language service.

use std::sync::Arc;

use crate::backend::LanguageService;
use crate::model::{AnalysisOutcome, SentenceAnalysis, SentimentScore};

/// Annotates one sentence with sentiment, key phrases and entities.
///
/// Never fails: a blank sentence gets a zero-signal analysis without a
/// backend call, and any failing call yields a neutral fallback.
#[derive(Clone)]
pub struct SentenceAnalyzer {
    service: Arc<dyn LanguageService>,
}

impl SentenceAnalyzer {
    /// Create an analyzer over a language service.
    pub fn new(service: Arc<dyn LanguageService>) -> Self {
        Self { service }
    }

    /// Analyze the sentence at `index`.
    pub fn analyze(&self, index: usize, sentence: &str, language: &str) -> AnalysisOutcome {
        let text = sentence.trim();
        if text.is_empty() {
            return AnalysisOutcome::Blank(SentenceAnalysis::neutral(
                index,
                text,
                SentimentScore::zero_signal(),
            ));
        }

        let service = self.service.as_ref();
        let (sentiment, (key_phrases, entities)) = rayon::join(
            || service.detect_sentiment(text, language),
            || {
                rayon::join(
                    || service.detect_key_phrases(text, language),
                    || service.detect_entities(text, language),
                )
            },
        );

        match (sentiment, key_phrases, entities) {
            (Ok(sentiment), Ok(key_phrases), Ok(entities)) => {
                AnalysisOutcome::Analyzed(SentenceAnalysis {
                    index,
                    text: text.to_string(),
                    sentiment: sentiment.label,
                    sentiment_score: sentiment.scores,
                    key_phrases,
                    entities,
                    importance_score: 0.0,
                })
            }
            (Err(cause), _, _) | (_, Err(cause), _) | (_, _, Err(cause)) => {
                log::warn!(
                    "Sentence {}: language service failed, using neutral analysis: {}",
                    index,
                    cause
                );
                AnalysisOutcome::Fallback {
                    analysis: SentenceAnalysis::neutral(index, text, SentimentScore::balanced()),
                    cause,
                }
            }
        }
    }
}
