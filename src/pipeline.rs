//! The document analysis pipeline.
//!
//! Bytes go in, an [`AnalysisResult`] comes out: extract text (OCR and
//! layout reconstruction, or plain decoding), detect the language, then
//! translate or summarize.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::SentenceAnalyzer;
use crate::backend::{LanguageClassifier, LanguageService, OcrProvider, TranslationBackend};
use crate::error::{Error, Result};
use crate::extract::{ExtractorRegistry, ImageExtractor, PdfExtractor, PlainTextExtractor};
use crate::language::{LanguageDetector, LanguageOptions, SUPPORTED_LANGUAGES};
use crate::layout::{LayoutOptions, LayoutReconstructor};
use crate::model::{AnalysisRequest, AnalysisResult, AnalysisType, SummaryLength};
use crate::summarize::{Summarizer, SummarizerOptions};
use crate::text::{ChunkOptions, NormalizeOptions, TextChunker, TextNormalizer};
use crate::translate::TranslationOrchestrator;

const WEIGHT_SUM_EPSILON: f32 = 1e-3;

/// Configuration of the whole pipeline.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    pub layout: LayoutOptions,
    pub normalize: NormalizeOptions,
    pub chunk: ChunkOptions,
    pub language: LanguageOptions,
    pub summarizer: SummarizerOptions,

    /// Image OCR is retried with table and form analysis below this many
    /// characters
    pub image_retry_min_chars: usize,

    /// Accepted translation targets; empty accepts any code
    pub supported_languages: Vec<String>,

    /// Used when a summarize request names no length
    pub default_summary_length: SummaryLength,
}

impl AnalyzerOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set the normalization options.
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the chunking options.
    pub fn with_chunk(mut self, chunk: ChunkOptions) -> Self {
        self.chunk = chunk;
        self
    }

    /// Set the language detection options.
    pub fn with_language(mut self, language: LanguageOptions) -> Self {
        self.language = language;
        self
    }

    /// Set the summarizer options.
    pub fn with_summarizer(mut self, summarizer: SummarizerOptions) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Set the image OCR retry threshold in characters.
    pub fn with_image_retry_min_chars(mut self, chars: usize) -> Self {
        self.image_retry_min_chars = chars;
        self
    }

    /// Set the accepted translation targets.
    pub fn with_supported_languages<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_languages = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Check structural sanity of the configuration.
    pub fn validate(&self) -> Result<()> {
        let weights = &self.summarizer.weights;
        if weights.sentiment < 0.0 || weights.key_phrase < 0.0 || weights.entity < 0.0 {
            return Err(Error::Config("scoring weights must not be negative".into()));
        }
        if (weights.sum() - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(Error::Config(format!(
                "scoring weights must sum to 1.0, got {:.3}",
                weights.sum()
            )));
        }

        let threshold = self.summarizer.similarity_threshold;
        if threshold.is_nan() || threshold <= 0.0 || threshold > 1.0 {
            return Err(Error::Config(format!(
                "similarity threshold must be in (0, 1], got {}",
                threshold
            )));
        }

        let min_chunk = self.chunk.size_unit.min_chunk_size();
        if self.chunk.max_chunk_size < min_chunk {
            return Err(Error::Config(format!(
                "max chunk size must be at least {} when measured in {:?}",
                min_chunk, self.chunk.size_unit
            )));
        }
        if self.language.max_sample_chars == 0 {
            return Err(Error::Config("language sample size must be positive".into()));
        }
        if self.language.default_language.trim().is_empty() {
            return Err(Error::Config("default language must not be empty".into()));
        }
        let tolerance = self.layout.row_tolerance;
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(Error::Config("row tolerance must not be negative".into()));
        }

        Ok(())
    }

    /// Whether `code` is an accepted translation target.
    pub fn is_supported_target(&self, code: &str) -> bool {
        self.supported_languages.is_empty()
            || self
                .supported_languages
                .iter()
                .any(|c| c.eq_ignore_ascii_case(code.trim()))
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            normalize: NormalizeOptions::default(),
            chunk: ChunkOptions::default(),
            language: LanguageOptions::default(),
            summarizer: SummarizerOptions::default(),
            image_retry_min_chars: 100,
            supported_languages: SUPPORTED_LANGUAGES
                .iter()
                .map(|(code, _)| code.to_string())
                .collect(),
            default_summary_length: SummaryLength::default(),
        }
    }
}

/// Builder for [`DocumentAnalyzer`]. All four collaborators are required.
pub struct DocumentAnalyzerBuilder {
    options: AnalyzerOptions,
    ocr: Option<Arc<dyn OcrProvider>>,
    translator: Option<Arc<dyn TranslationBackend>>,
    classifier: Option<Arc<dyn LanguageClassifier>>,
    language_service: Option<Arc<dyn LanguageService>>,
}

impl DocumentAnalyzerBuilder {
    /// Set the OCR provider.
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrProvider>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Set the translation backend.
    pub fn with_translator(mut self, translator: Arc<dyn TranslationBackend>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Set the language classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn LanguageClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the sentence analysis service.
    pub fn with_language_service(mut self, service: Arc<dyn LanguageService>) -> Self {
        self.language_service = Some(service);
        self
    }

    /// Validate the options and assemble the pipeline.
    pub fn build(self) -> Result<DocumentAnalyzer> {
        self.options.validate()?;

        let ocr = self.ocr.ok_or_else(|| missing("OCR provider"))?;
        let translator = self.translator.ok_or_else(|| missing("translation backend"))?;
        let classifier = self.classifier.ok_or_else(|| missing("language classifier"))?;
        let service = self
            .language_service
            .ok_or_else(|| missing("language service"))?;

        let options = self.options;
        let normalizer = TextNormalizer::new(options.normalize.clone());
        let layout = LayoutReconstructor::new(options.layout.clone()).with_normalizer(normalizer.clone());

        let mut extractors = ExtractorRegistry::new();
        extractors.register(Arc::new(PdfExtractor::new(ocr.clone(), layout.clone())));
        extractors.register(Arc::new(
            ImageExtractor::new(ocr, layout).with_retry_min_chars(options.image_retry_min_chars),
        ));
        extractors.register(Arc::new(PlainTextExtractor::new(normalizer)));

        Ok(DocumentAnalyzer {
            extractors,
            detector: LanguageDetector::new(classifier, options.language.clone()),
            translator: TranslationOrchestrator::new(
                translator,
                TextChunker::new(options.chunk.clone()),
            ),
            summarizer: Summarizer::new(
                SentenceAnalyzer::new(service),
                options.summarizer.clone(),
            ),
            options,
        })
    }
}

fn missing(what: &str) -> Error {
    Error::Config(format!("no {} configured", what))
}

/// Extracts, detects language, and translates or summarizes documents.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct DocumentAnalyzer {
    extractors: ExtractorRegistry,
    detector: LanguageDetector,
    translator: TranslationOrchestrator,
    summarizer: Summarizer,
    options: AnalyzerOptions,
}

impl DocumentAnalyzer {
    /// Start building an analyzer.
    pub fn builder(options: AnalyzerOptions) -> DocumentAnalyzerBuilder {
        DocumentAnalyzerBuilder {
            options,
            ocr: None,
            translator: None,
            classifier: None,
            language_service: None,
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Extract normalized text without further analysis.
    pub fn extract_text(&self, data: &[u8], mime: Option<&str>) -> Result<String> {
        self.extractors.extract(data, mime)
    }

    /// Run one analysis request over document bytes.
    pub fn analyze(
        &self,
        data: &[u8],
        mime: Option<&str>,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult> {
        let target = self.check_request(request)?;

        let text = self.extract_text(data, mime)?;
        let source_language = self.detector.detect(&text);
        log::info!(
            "Analyzing {} chars ({}) for {}",
            text.chars().count(),
            source_language,
            request.analysis_type
        );

        let result_text = match request.analysis_type {
            AnalysisType::Translate => {
                let target = target.as_deref().unwrap_or_default();
                self.translator.translate(&text, &source_language, target)?
            }
            AnalysisType::Summarize => {
                let length = request
                    .summary_length
                    .unwrap_or(self.options.default_summary_length);
                self.summarizer.summarize(&text, &source_language, length)
            }
        };

        Ok(AnalysisResult {
            analysis_type: request.analysis_type,
            source_language,
            target_language: target,
            original_text: text,
            result_text,
        })
    }

    /// The trimmed target language, checked against the catalog.
    fn check_request(&self, request: &AnalysisRequest) -> Result<Option<String>> {
        if request.analysis_type != AnalysisType::Translate {
            return Ok(None);
        }

        let target = request
            .target_language
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::InvalidRequest("translation requires a target language".into())
            })?;

        if !self.options.is_supported_target(target) {
            return Err(Error::UnsupportedLanguagePair {
                source_language: "auto".to_string(),
                target_language: target.to_string(),
            });
        }

        Ok(Some(target.to_string()))
    }
}
