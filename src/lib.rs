//! # doclens
//!
//! Document text analysis over OCR output.
//!
//! This library turns OCR layout blocks into reading-order text, then
//! translates it through a size-limited backend or builds an extractive
//! summary from per-sentence language analysis.
//!
//! ## Quick Start
//!
//! ```no_run
//! use doclens::{load_blocks, LayoutReconstructor, TextChunker};
//!
//! fn main() -> doclens::Result<()> {
//!     // Load an OCR response and rebuild its text
//!     let blocks = load_blocks("response.json")?;
//!     let text = LayoutReconstructor::default().reconstruct(blocks);
//!
//!     // Split it for a translation backend
//!     for chunk in TextChunker::with_max_size(4800).chunk(&text) {
//!         println!("{}: {} chars", chunk.index, chunk.text.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Reading order**: row-tolerant ordering of lines, tables and form fields
//! - **Tables and forms**: delimited table rows and labelled key/value fields
//! - **Chunked translation**: ordered, all-or-nothing chunk translation
//! - **Extractive summaries**: weighted sentence scoring with near-duplicate removal
//! - **Parallel processing**: uses Rayon for per-sentence analysis
//! - **Pluggable backends**: OCR, translation and language services are traits

pub mod analysis;
pub mod backend;
pub mod detect;
pub mod error;
pub mod extract;
pub mod language;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod summarize;
pub mod text;
pub mod translate;

// Re-export commonly used types
pub use analysis::SentenceAnalyzer;
pub use backend::{
    BackendResult, DetectedLanguage, LanguageClassifier, LanguageService, OcrFeatures,
    OcrProvider, TranslationBackend,
};
pub use detect::{detect_media_kind, MediaKind};
pub use error::{BackendError, Error, Result};
pub use extract::{ExtractorRegistry, TextExtractor};
pub use language::{LanguageDetection, LanguageDetector, LanguageOptions, SUPPORTED_LANGUAGES};
pub use layout::{LayoutOptions, LayoutReconstructor};
pub use model::{
    parse_blocks_json, AnalysisOutcome, AnalysisRequest, AnalysisResult, AnalysisType, Block,
    BlockGraph, BlockType, BoundingBox, SentenceAnalysis, Sentiment, SentimentResult,
    SentimentScore, SummaryLength,
};
pub use pipeline::{AnalyzerOptions, DocumentAnalyzer, DocumentAnalyzerBuilder};
pub use summarize::{LengthPolicy, ScoringWeights, Summarizer, SummarizerOptions, Summary};
pub use text::{normalize, Chunk, ChunkOptions, NormalizeOptions, SizeUnit, TextChunker, TextNormalizer};
pub use translate::TranslationOrchestrator;

use std::path::Path;

/// Load OCR blocks from a JSON response file.
///
/// Accepts `{"Blocks": [...]}` or a bare block array.
///
/// # Example
///
/// ```no_run
/// use doclens::load_blocks;
///
/// let blocks = load_blocks("response.json").unwrap();
/// println!("Blocks: {}", blocks.len());
/// ```
pub fn load_blocks<P: AsRef<Path>>(path: P) -> Result<Vec<Block>> {
    let data = std::fs::read(path)?;
    parse_blocks_json(&data)
}

/// Rebuild normalized reading-order text from an OCR response file.
///
/// # Example
///
/// ```no_run
/// use doclens::reconstruct_file;
///
/// let text = reconstruct_file("response.json").unwrap();
/// println!("{}", text);
/// ```
pub fn reconstruct_file<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(layout::reconstruct(load_blocks(path)?))
}

/// Rebuild text from an OCR response file with custom options.
pub fn reconstruct_file_with_options<P: AsRef<Path>>(
    path: P,
    options: LayoutOptions,
) -> Result<String> {
    let blocks = load_blocks(path)?;
    Ok(LayoutReconstructor::new(options).reconstruct(blocks))
}
