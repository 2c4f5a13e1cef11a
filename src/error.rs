//! Error types for doclens.

use std::io;
use thiserror::Error;

/// Result type alias for doclens operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the caller of the analysis pipeline.
///
/// Per-sentence analysis failures and language detection failures never
/// appear here; they are absorbed where they happen (see
/// [`AnalysisOutcome`](crate::model::AnalysisOutcome) and
/// [`LanguageDetection`](crate::language::LanguageDetection)).
#[derive(Error, Debug)]
pub enum Error {
    /// OCR failed, or extraction produced no usable text.
    #[error("Document extraction failed: {message}")]
    Extraction {
        message: String,
        #[source]
        cause: Option<BackendError>,
    },

    /// A translation chunk call failed. Partial output is discarded.
    #[error("Translation failed at chunk {chunk_index}: {detail}")]
    Translation { chunk_index: usize, detail: String },

    /// The translation backend (or the language catalog) rejected the pair.
    #[error("Unsupported language pair: {source_language} -> {target_language}")]
    UnsupportedLanguagePair {
        source_language: String,
        target_language: String,
    },

    /// No extractor handles this document type.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The request is missing something it needs.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Options failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON (OCR responses, configuration files).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an extraction error without an upstream cause.
    pub fn extraction(message: impl Into<String>) -> Self {
        Error::Extraction {
            message: message.into(),
            cause: None,
        }
    }

    /// Whether the caller could retry with a different target language.
    pub fn is_language_pair_error(&self) -> bool {
        matches!(self, Error::UnsupportedLanguagePair { .. })
    }
}

/// Failure reported by an external collaborator (OCR, translation,
/// language classification, sentence annotation).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend does not translate between these languages.
    #[error("language pair {source_language} -> {target_language} is not supported")]
    UnsupportedLanguagePair {
        source_language: String,
        target_language: String,
    },

    /// The backend rejected the input (too long, bad encoding, bad language code).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Rate limited.
    #[error("throttled: {0}")]
    Throttled(String),

    /// The backend could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Any other backend-side failure.
    #[error("{0}")]
    Service(String),
}
