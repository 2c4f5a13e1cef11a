//! Chunked translation of long texts.

use std::sync::Arc;

use crate::backend::TranslationBackend;
use crate::error::{BackendError, Error, Result};
use crate::language::same_language;
use crate::text::{TextChunker, CHUNK_SEPARATOR};

/// Translates text of any length through a size-limited backend.
///
/// Chunks are sent one at a time, in order. The first failing chunk aborts
/// the whole translation and nothing already translated is returned.
#[derive(Clone)]
pub struct TranslationOrchestrator {
    backend: Arc<dyn TranslationBackend>,
    chunker: TextChunker,
}

impl TranslationOrchestrator {
    /// Create an orchestrator.
    pub fn new(backend: Arc<dyn TranslationBackend>, chunker: TextChunker) -> Self {
        Self { backend, chunker }
    }

    /// The chunker used to split input text.
    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Translate `text` from `source_language` into `target_language`.
    ///
    /// Identical languages return the text unchanged without a backend call.
    pub fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        if same_language(source_language, target_language) {
            log::debug!(
                "Translation: source and target are both {}, nothing to do",
                source_language
            );
            return Ok(text.to_string());
        }

        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Ok(String::new());
        }
        log::info!(
            "Translating {} chunk(s) {} -> {}",
            chunks.len(),
            source_language,
            target_language
        );

        let mut translated = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let result = self
                .backend
                .translate_chunk(&chunk.text, source_language, target_language)
                .map_err(|e| translation_error(chunk.index, e))?;
            log::debug!(
                "Translation: chunk {} ({} -> {} chars)",
                chunk.index,
                chunk.text.chars().count(),
                result.chars().count()
            );
            translated.push(result);
        }

        Ok(translated.join(CHUNK_SEPARATOR))
    }
}

fn translation_error(chunk_index: usize, error: BackendError) -> Error {
    match error {
        BackendError::UnsupportedLanguagePair {
            source_language,
            target_language,
        } => Error::UnsupportedLanguagePair {
            source_language,
            target_language,
        },
        other => {
            log::warn!("Translation aborted at chunk {}: {}", chunk_index, other);
            Error::Translation {
                chunk_index,
                detail: other.to_string(),
            }
        }
    }
}
