//! Contracts for the external services the pipeline consumes.
//!
//! Implementations live outside this crate (cloud OCR, machine
//! translation, language classification, sentence annotation). Every
//! trait is object-safe and `Send + Sync` so one instance can be shared
//! across parallel sentence analysis.

use crate::error::BackendError;
use crate::model::{Block, SentimentResult};

/// Result type for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Which OCR analyses to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OcrFeatures {
    pub tables: bool,
    pub forms: bool,
}

impl OcrFeatures {
    /// Plain text detection (pages, lines, words).
    pub const TEXT: OcrFeatures = OcrFeatures {
        tables: false,
        forms: false,
    };

    /// Text plus table and form analysis.
    pub const TABLES_AND_FORMS: OcrFeatures = OcrFeatures {
        tables: true,
        forms: true,
    };

    /// Whether any structural analysis is requested.
    pub fn is_structural(&self) -> bool {
        self.tables || self.forms
    }
}

/// Detects layout primitives in document bytes.
pub trait OcrProvider: Send + Sync {
    /// Return the flat block list for the document.
    fn detect_layout(&self, document: &[u8], features: OcrFeatures) -> BackendResult<Vec<Block>>;
}

/// Translates one chunk of text.
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`.
    ///
    /// Must accept texts up to the configured maximum chunk size.
    fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> BackendResult<String>;
}

/// A candidate language with its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLanguage {
    pub language_code: String,
    pub score: f32,
}

impl DetectedLanguage {
    /// Create a candidate.
    pub fn new(language_code: impl Into<String>, score: f32) -> Self {
        Self {
            language_code: language_code.into(),
            score,
        }
    }
}

/// Classifies the dominant language of a text sample.
pub trait LanguageClassifier: Send + Sync {
    /// Candidate languages for the sample, in any order.
    fn detect_dominant_language(&self, sample: &str) -> BackendResult<Vec<DetectedLanguage>>;
}

/// Per-sentence sentiment, key phrase and entity annotation.
pub trait LanguageService: Send + Sync {
    /// Sentiment label and scores.
    fn detect_sentiment(&self, text: &str, language: &str) -> BackendResult<SentimentResult>;

    /// Key phrases found in the text.
    fn detect_key_phrases(&self, text: &str, language: &str) -> BackendResult<Vec<String>>;

    /// Named entities found in the text.
    fn detect_entities(&self, text: &str, language: &str) -> BackendResult<Vec<String>>;
}
