//! Extractive summarization.
//!
//! Sentences are analyzed (in parallel), scored, the top K selected and
//! put back in document order, near-duplicates dropped, and the survivors
//! joined into the summary. Every summary sentence is a sentence of the
//! input.

mod scoring;
mod select;

pub use scoring::{importance_score, PositionBoosts, ScoringWeights};
pub use select::{join_summary, remove_near_duplicates, select_top};

use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

use crate::analysis::SentenceAnalyzer;
use crate::model::{AnalysisOutcome, SentenceAnalysis, SummaryLength};
use crate::text::split_sentences;

/// How many sentences a summary length keeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthPolicy {
    /// Floor on the number of selected sentences; documents with at most
    /// this many sentences are returned unchanged
    pub min_sentences: usize,
    /// Share of the document's sentences to keep
    pub fraction: f32,
}

impl LengthPolicy {
    /// Create a policy with a sentence floor and a share to keep.
    pub fn new(min_sentences: usize, fraction: f32) -> Self {
        Self {
            min_sentences,
            fraction,
        }
    }

    /// Sentences to select from a document of `total` sentences.
    pub fn target_count(&self, total: usize) -> usize {
        let share = (self.fraction.max(0.0) * total as f32).ceil() as usize;
        share.max(self.min_sentences).min(total)
    }

    fn merged(self, partial: PartialLengthPolicy) -> Self {
        Self {
            min_sentences: partial.min_sentences.unwrap_or(self.min_sentences),
            fraction: partial.fraction.unwrap_or(self.fraction),
        }
    }
}

impl Default for LengthPolicy {
    fn default() -> Self {
        LengthPolicies::default().medium
    }
}

/// A policy as written in a config file, where either field may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialLengthPolicy {
    min_sentences: Option<usize>,
    fraction: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialLengthPolicies {
    short: Option<PartialLengthPolicy>,
    medium: Option<PartialLengthPolicy>,
    long: Option<PartialLengthPolicy>,
}

/// Per-length policies.
///
/// Deserializing merges each named policy onto its own default, so
/// `{"short": {"min_sentences": 3}}` keeps the short fraction of 0.10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthPolicies {
    pub short: LengthPolicy,
    pub medium: LengthPolicy,
    pub long: LengthPolicy,
}

impl LengthPolicies {
    /// Policy for a summary length.
    pub fn get(&self, length: SummaryLength) -> LengthPolicy {
        match length {
            SummaryLength::Short => self.short,
            SummaryLength::Medium => self.medium,
            SummaryLength::Long => self.long,
        }
    }
}

impl Default for LengthPolicies {
    fn default() -> Self {
        Self {
            short: LengthPolicy::new(2, 0.10),
            medium: LengthPolicy::new(5, 0.20),
            long: LengthPolicy::new(10, 0.35),
        }
    }
}

impl<'de> Deserialize<'de> for LengthPolicies {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let partial = PartialLengthPolicies::deserialize(deserializer)?;
        let defaults = Self::default();
        let merge = |policy: LengthPolicy, over: Option<PartialLengthPolicy>| match over {
            Some(over) => policy.merged(over),
            None => policy,
        };
        Ok(Self {
            short: merge(defaults.short, partial.short),
            medium: merge(defaults.medium, partial.medium),
            long: merge(defaults.long, partial.long),
        })
    }
}

/// Summarizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerOptions {
    pub weights: ScoringWeights,
    pub boosts: PositionBoosts,

    /// Jaccard similarity at or above which a sentence counts as a
    /// near-duplicate of one already kept
    pub similarity_threshold: f32,

    pub lengths: LengthPolicies,

    /// Analyze sentences on the rayon thread pool
    pub parallel: bool,
}

impl SummarizerOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the position boosts.
    pub fn with_boosts(mut self, boosts: PositionBoosts) -> Self {
        self.boosts = boosts;
        self
    }

    /// Set the near-duplicate similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the policy for one summary length.
    pub fn with_length_policy(mut self, length: SummaryLength, policy: LengthPolicy) -> Self {
        match length {
            SummaryLength::Short => self.lengths.short = policy,
            SummaryLength::Medium => self.lengths.medium = policy,
            SummaryLength::Long => self.lengths.long = policy,
        }
        self
    }

    /// Enable or disable parallel sentence analysis.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            boosts: PositionBoosts::default(),
            similarity_threshold: 0.55,
            lengths: LengthPolicies::default(),
            parallel: true,
        }
    }
}

/// A summary together with the data it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    /// Summary sentences, in document order
    pub sentences: Vec<String>,
    /// Scored analyses of every input sentence; empty when the document was
    /// short enough to be returned as-is
    pub analyzed: Vec<SentenceAnalysis>,
    /// Sentences whose analysis fell back to neutral
    pub fallback_count: usize,
}

/// Extractive summarizer over a [`SentenceAnalyzer`].
#[derive(Clone)]
pub struct Summarizer {
    analyzer: SentenceAnalyzer,
    options: SummarizerOptions,
}

impl Summarizer {
    /// Create a summarizer.
    pub fn new(analyzer: SentenceAnalyzer, options: SummarizerOptions) -> Self {
        Self { analyzer, options }
    }

    /// Get the options.
    pub fn options(&self) -> &SummarizerOptions {
        &self.options
    }

    /// Summarize `text` written in `language`.
    pub fn summarize(&self, text: &str, language: &str, length: SummaryLength) -> String {
        self.summarize_detailed(text, language, length).text
    }

    /// Summarize and keep the intermediate analyses.
    pub fn summarize_detailed(&self, text: &str, language: &str, length: SummaryLength) -> Summary {
        let sentences = split_sentences(text);
        let policy = self.options.lengths.get(length);

        if sentences.len() <= policy.min_sentences {
            log::debug!(
                "Summarizer: {} sentence(s), at or below {}, returned as-is",
                sentences.len(),
                policy.min_sentences
            );
            return Summary {
                text: sentences.join(" "),
                sentences: sentences.iter().map(|s| s.to_string()).collect(),
                analyzed: Vec::new(),
                fallback_count: 0,
            };
        }

        let outcomes = self.analyze_all(&sentences, language);
        let fallback_count = outcomes.iter().filter(|o| o.is_fallback()).count();
        if fallback_count > 0 {
            log::warn!(
                "Summarizer: {} of {} sentence(s) analyzed with neutral fallback",
                fallback_count,
                outcomes.len()
            );
        }

        let total = sentences.len();
        let analyzed: Vec<SentenceAnalysis> = outcomes
            .into_iter()
            .map(|outcome| {
                let mut analysis = outcome.into_analysis();
                analysis.importance_score = importance_score(
                    &analysis,
                    total,
                    &self.options.weights,
                    &self.options.boosts,
                );
                analysis
            })
            .collect();

        let k = policy.target_count(total);
        let selected: Vec<&str> = select_top(&analyzed, k)
            .into_iter()
            .map(|i| sentences[i])
            .collect();
        let kept = remove_near_duplicates(&selected, self.options.similarity_threshold);

        log::info!(
            "Summarized {} sentence(s) into {} (selected {})",
            total,
            kept.len(),
            k
        );

        Summary {
            text: join_summary(&kept),
            sentences: kept.iter().map(|s| s.to_string()).collect(),
            analyzed,
            fallback_count,
        }
    }

    fn analyze_all(&self, sentences: &[&str], language: &str) -> Vec<AnalysisOutcome> {
        if self.options.parallel {
            sentences
                .par_iter()
                .enumerate()
                .map(|(i, s)| self.analyzer.analyze(i, s, language))
                .collect()
        } else {
            sentences
                .iter()
                .enumerate()
                .map(|(i, s)| self.analyzer.analyze(i, s, language))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendResult, LanguageService};
    use crate::error::BackendError;
    use crate::model::{SentimentResult, SentimentScore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Reports every capitalised word as an entity; fails on "FAIL".
    struct CapitalsService {
        calls: AtomicUsize,
    }

    impl LanguageService for CapitalsService {
        fn detect_sentiment(&self, text: &str, _language: &str) -> BackendResult<SentimentResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("FAIL") {
                return Err(BackendError::Service("boom".into()));
            }
            Ok(SentimentResult {
                scores: SentimentScore::zero_signal(),
                ..Default::default()
            })
        }

        fn detect_key_phrases(&self, _text: &str, _language: &str) -> BackendResult<Vec<String>> {
            Ok(Vec::new())
        }

        fn detect_entities(&self, text: &str, _language: &str) -> BackendResult<Vec<String>> {
            Ok(text
                .split_whitespace()
                .skip(1)
                .filter(|w| w.starts_with(char::is_uppercase))
                .map(str::to_string)
                .collect())
        }
    }

    fn summarizer(parallel: bool) -> (Summarizer, Arc<CapitalsService>) {
        let service = Arc::new(CapitalsService {
            calls: AtomicUsize::new(0),
        });
        let summarizer = Summarizer::new(
            SentenceAnalyzer::new(service.clone()),
            SummarizerOptions::new().with_parallel(parallel),
        );
        (summarizer, service)
    }

    #[test]
    fn test_target_count() {
        let short = LengthPolicy::new(2, 0.10);
        assert_eq!(short.target_count(4), 2);
        assert_eq!(short.target_count(40), 4);
        assert_eq!(short.target_count(41), 5);
        assert_eq!(LengthPolicy::new(10, 0.35).target_count(6), 6);
    }

    #[test]
    fn test_short_document_returned_as_is() {
        let (summarizer, service) = summarizer(true);
        let summary = summarizer.summarize_detailed("One. Two", "en", SummaryLength::Short);
        assert_eq!(summary.text, "One. Two");
        assert!(summary.analyzed.is_empty());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_repeated_sentences_collapse() {
        let (summarizer, _) = summarizer(false);
        let summary = summarizer.summarize(
            "Same words here. Same words here. Same words here.",
            "en",
            SummaryLength::Short,
        );
        assert_eq!(summary, "Same words here.");
    }

    #[test]
    fn test_entity_rich_sentences_selected() {
        let (summarizer, _) = summarizer(true);
        let text = "intro line. the weather was mild. Alice met Bob in Paris. nothing else happened. \
                    we went home. Carol called Dave from Rome. the end";
        let summary = summarizer.summarize_detailed(text, "en", SummaryLength::Short);
        assert_eq!(summary.analyzed.len(), 7);
        assert_eq!(
            summary.sentences,
            vec!["Alice met Bob in Paris.", "Carol called Dave from Rome."]
        );
        assert_eq!(
            summary.text,
            "Alice met Bob in Paris. Carol called Dave from Rome."
        );
    }

    #[test]
    fn test_fallbacks_are_counted_not_fatal() {
        let (summarizer, _) = summarizer(true);
        let summary = summarizer.summarize_detailed(
            "First FAIL. Second one. Third one here.",
            "en",
            SummaryLength::Short,
        );
        assert_eq!(summary.fallback_count, 1);
        assert!(!summary.text.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let text = "A b c. Dd Ee ff. gg Hh. ii jj kk. Ll mm. nn Oo Pp Qq. rr.";
        let (parallel, _) = summarizer(true);
        let (sequential, _) = summarizer(false);
        assert_eq!(
            parallel.summarize(text, "en", SummaryLength::Medium),
            sequential.summarize(text, "en", SummaryLength::Medium)
        );
    }
}
