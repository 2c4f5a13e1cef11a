//! Text extraction from uploaded documents.
//!
//! Extractors are registered per [`MediaKind`]; the registry resolves the
//! kind of incoming bytes and dispatches to the matching extractor.
//!
//! # Example
//!
//! ```no_run
//! use doclens::extract::{ExtractorRegistry, PlainTextExtractor};
//! use std::sync::Arc;
//!
//! fn main() -> doclens::Result<()> {
//!     let mut registry = ExtractorRegistry::new();
//!     registry.register(Arc::new(PlainTextExtractor::default()));
//!
//!     let text = registry.extract(b"Hello   world.", Some("text/plain"))?;
//!     assert_eq!(text, "Hello world.");
//!     Ok(())
//! }
//! ```

mod ocr;
mod plain;

pub use ocr::{ImageExtractor, PdfExtractor};
pub use plain::PlainTextExtractor;

use std::collections::HashMap;
use std::sync::Arc;

use crate::detect::{detect_media_kind, MediaKind};
use crate::error::{Error, Result};

/// Turns document bytes of some media kinds into normalized text.
pub trait TextExtractor: Send + Sync {
    /// Short identifier, e.g. `"pdf"`.
    fn name(&self) -> &str;

    /// Media kinds this extractor handles.
    fn media_kinds(&self) -> &[MediaKind];

    /// Extract normalized text. May return an empty string; the registry
    /// turns that into an error.
    fn extract(&self, data: &[u8]) -> Result<String>;

    /// Check if this extractor handles the given kind.
    fn supports(&self, kind: MediaKind) -> bool {
        self.media_kinds().contains(&kind)
    }
}

/// Registry of extractors keyed by media kind.
#[derive(Default)]
pub struct ExtractorRegistry {
    by_kind: HashMap<MediaKind, Arc<dyn TextExtractor>>,
    by_name: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor for all its media kinds, replacing any earlier
    /// one for the same kind.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        for kind in extractor.media_kinds() {
            self.by_kind.insert(*kind, extractor.clone());
        }
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get the extractor for a media kind.
    pub fn get(&self, kind: MediaKind) -> Option<Arc<dyn TextExtractor>> {
        self.by_kind.get(&kind).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a media kind is handled.
    pub fn supports(&self, kind: MediaKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// Extract text from document bytes.
    ///
    /// Fails with [`Error::UnsupportedMediaType`] when no extractor handles
    /// the document and with [`Error::Extraction`] when no text came out.
    pub fn extract(&self, data: &[u8], mime: Option<&str>) -> Result<String> {
        let kind = detect_media_kind(data, mime)?;
        let extractor = self
            .get(kind)
            .ok_or_else(|| Error::UnsupportedMediaType(kind.to_string()))?;

        log::debug!(
            "Extracting {} bytes of {} with '{}'",
            data.len(),
            kind,
            extractor.name()
        );
        let text = extractor.extract(data)?;
        if text.trim().is_empty() {
            return Err(Error::extraction(format!(
                "no text could be extracted from the {} document",
                kind
            )));
        }
        Ok(text)
    }
}
