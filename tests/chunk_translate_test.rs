//! Integration tests for chunking and chunked translation.

use std::sync::{Arc, Mutex};

use doclens::backend::{BackendResult, TranslationBackend};
use doclens::error::{BackendError, Error};
use doclens::text::{chunk_text, normalize, reassemble, ChunkOptions, SizeUnit, TextChunker};
use doclens::translate::TranslationOrchestrator;

/// Mock backend that tags each chunk and can fail on a given call.
struct MockTranslator {
    calls: Mutex<Vec<(String, String, String)>>,
    fail_at: Option<usize>,
}

impl MockTranslator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_at: None,
        })
    }

    fn failing_at(call: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_at: Some(call),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl TranslationBackend for MockTranslator {
    fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> BackendResult<String> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push((
            text.to_string(),
            source_language.to_string(),
            target_language.to_string(),
        ));
        if self.fail_at == Some(index) {
            return Err(BackendError::Unavailable("connection reset".into()));
        }
        Ok(format!("[{}]", text))
    }
}

fn long_document() -> String {
    (1..=40)
        .map(|i| format!("Sentence number {} talks about item {}.", i, i * 7))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_chunk_three_short_sentences() {
    let chunks: Vec<String> = chunk_text("A. B. C.", 4).into_iter().map(|c| c.text).collect();
    assert_eq!(chunks, vec!["A.", "B.", "C."]);
}

#[test]
fn test_chunks_respect_limit() {
    let text = long_document();
    for max in [10, 37, 64, 200, 4800] {
        let chunks = chunk_text(&text, max);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= max, "max {max}: {:?}", chunk.text);
        }
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }
}

#[test]
fn test_chunks_reassemble_to_input() {
    let text = long_document();
    for max in [50, 120, 4800] {
        assert_eq!(reassemble(&chunk_text(&text, max)), text);
    }
}

#[test]
fn test_oversized_unit_is_never_dropped() {
    let word = "x".repeat(25);
    let text = format!("Short. {} Tail.", word);
    let chunks = chunk_text(&text, 10);
    let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(joined.matches('x').count(), 25);
    assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));
}

#[test]
fn test_byte_limit_with_multibyte_text() {
    let text = normalize("Tiếng Việt có dấu. Rất nhiều dấu ở đây.");
    let chunker = TextChunker::new(
        ChunkOptions::new()
            .with_max_chunk_size(16)
            .with_size_unit(SizeUnit::Bytes),
    );
    for chunk in chunker.chunk(&text) {
        assert!(chunk.text.len() <= 16, "{:?}", chunk.text);
    }
}

#[test]
fn test_translation_preserves_chunk_order() {
    let backend = MockTranslator::new();
    let translator = TranslationOrchestrator::new(backend.clone(), TextChunker::with_max_size(60));
    let text = long_document();

    let translated = translator.translate(&text, "en", "vi").unwrap();
    let expected: Vec<String> = chunk_text(&text, 60)
        .into_iter()
        .map(|c| format!("[{}]", c.text))
        .collect();
    assert_eq!(translated, expected.join(" "));

    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls.len(), expected.len());
    assert!(calls.iter().all(|(_, s, t)| s == "en" && t == "vi"));
}

#[test]
fn test_identity_translation_skips_backend() {
    let backend = MockTranslator::new();
    let translator = TranslationOrchestrator::new(backend.clone(), TextChunker::default());
    let text = long_document();
    assert_eq!(translator.translate(&text, "vi", "vi").unwrap(), text);
    assert_eq!(backend.call_count(), 0);
}

#[test]
fn test_failed_chunk_discards_everything() {
    let backend = MockTranslator::failing_at(2);
    let translator = TranslationOrchestrator::new(backend.clone(), TextChunker::with_max_size(60));

    let err = translator.translate(&long_document(), "en", "ja").unwrap_err();
    assert!(matches!(err, Error::Translation { chunk_index: 2, .. }));
    assert!(err.to_string().contains("connection reset"));
    assert_eq!(backend.call_count(), 3);
}
