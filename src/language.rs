//! Dominant-language detection and the supported language catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::LanguageClassifier;
use crate::error::BackendError;

/// Languages offered as translation targets, with display names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("vi", "Tiếng Việt"),
    ("en", "English"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("zh", "中文"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("es", "Español"),
    ("ru", "Русский"),
];

/// Display name of a supported language code.
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Whether two language codes name the same language.
pub fn same_language(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Options for language detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageOptions {
    /// Characters of the text sent to the classifier
    pub max_sample_chars: usize,

    /// Code used when detection fails or is inconclusive
    pub default_language: String,
}

impl LanguageOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample size.
    pub fn with_max_sample_chars(mut self, chars: usize) -> Self {
        self.max_sample_chars = chars;
        self
    }

    /// Set the fallback language.
    pub fn with_default_language(mut self, code: impl Into<String>) -> Self {
        self.default_language = code.into();
        self
    }
}

impl Default for LanguageOptions {
    fn default() -> Self {
        Self {
            max_sample_chars: 1000,
            default_language: "en".to_string(),
        }
    }
}

/// Outcome of language detection.
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageDetection {
    /// The classifier named a language.
    Detected { code: String, score: f32 },
    /// The default was used; `cause` is set when the classifier failed.
    Defaulted {
        code: String,
        cause: Option<BackendError>,
    },
}

impl LanguageDetection {
    /// The language code, detected or defaulted.
    pub fn code(&self) -> &str {
        match self {
            LanguageDetection::Detected { code, .. } | LanguageDetection::Defaulted { code, .. } => {
                code
            }
        }
    }

    /// Whether the default language was substituted.
    pub fn is_default(&self) -> bool {
        matches!(self, LanguageDetection::Defaulted { .. })
    }
}

/// Adapter over an external language classifier.
///
/// Only a bounded prefix of the text is sent. Classifier failures are
/// absorbed: the configured default language is returned instead.
#[derive(Clone)]
pub struct LanguageDetector {
    classifier: Arc<dyn LanguageClassifier>,
    options: LanguageOptions,
}

impl LanguageDetector {
    /// Create a detector.
    pub fn new(classifier: Arc<dyn LanguageClassifier>, options: LanguageOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    /// Detect the dominant language code.
    pub fn detect(&self, text: &str) -> String {
        self.detect_with_outcome(text).code().to_string()
    }

    /// Detect, reporting whether the default was substituted.
    pub fn detect_with_outcome(&self, text: &str) -> LanguageDetection {
        let sample = bounded_prefix(text, self.options.max_sample_chars);
        if sample.trim().is_empty() {
            return self.defaulted(None);
        }

        match self.classifier.detect_dominant_language(sample) {
            Ok(candidates) => {
                let best = candidates
                    .into_iter()
                    .filter(|c| !c.language_code.trim().is_empty())
                    .max_by(|a, b| a.score.total_cmp(&b.score));
                match best {
                    Some(found) => {
                        log::info!(
                            "Detected language {} (score {:.2})",
                            found.language_code,
                            found.score
                        );
                        LanguageDetection::Detected {
                            code: found.language_code,
                            score: found.score,
                        }
                    }
                    None => self.defaulted(None),
                }
            }
            Err(e) => {
                log::warn!(
                    "Language detection failed, using default {}: {}",
                    self.options.default_language,
                    e
                );
                self.defaulted(Some(e))
            }
        }
    }

    fn defaulted(&self, cause: Option<BackendError>) -> LanguageDetection {
        LanguageDetection::Defaulted {
            code: self.options.default_language.clone(),
            cause,
        }
    }
}

/// The first `max_chars` characters of `text`.
fn bounded_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
