//! OCR-backed extractors for PDFs and images.

use std::sync::Arc;

use crate::backend::{OcrFeatures, OcrProvider};
use crate::detect::MediaKind;
use crate::error::{BackendError, Error, Result};
use crate::layout::LayoutReconstructor;

use super::TextExtractor;

fn ocr_failed(kind: MediaKind, cause: BackendError) -> Error {
    log::warn!("OCR failed for {} document: {}", kind, cause);
    Error::Extraction {
        message: format!("OCR failed for {} document", kind),
        cause: Some(cause),
    }
}

/// Extracts PDFs with table and form analysis.
pub struct PdfExtractor {
    ocr: Arc<dyn OcrProvider>,
    layout: LayoutReconstructor,
}

impl PdfExtractor {
    pub fn new(ocr: Arc<dyn OcrProvider>, layout: LayoutReconstructor) -> Self {
        Self { ocr, layout }
    }
}

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn media_kinds(&self) -> &[MediaKind] {
        &[MediaKind::Pdf]
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let blocks = self
            .ocr
            .detect_layout(data, OcrFeatures::TABLES_AND_FORMS)
            .map_err(|e| ocr_failed(MediaKind::Pdf, e))?;
        log::debug!("PDF OCR returned {} blocks", blocks.len());
        Ok(self.layout.reconstruct(blocks))
    }
}

/// Extracts images with plain text detection, retrying with table and
/// form analysis when little text came back.
pub struct ImageExtractor {
    ocr: Arc<dyn OcrProvider>,
    layout: LayoutReconstructor,
    retry_min_chars: usize,
}

impl ImageExtractor {
    pub fn new(ocr: Arc<dyn OcrProvider>, layout: LayoutReconstructor) -> Self {
        Self {
            ocr,
            layout,
            retry_min_chars: 100,
        }
    }

    /// Retry with structural analysis below this many characters.
    pub fn with_retry_min_chars(mut self, chars: usize) -> Self {
        self.retry_min_chars = chars;
        self
    }
}

impl TextExtractor for ImageExtractor {
    fn name(&self) -> &str {
        "image"
    }

    fn media_kinds(&self) -> &[MediaKind] {
        &[MediaKind::Image]
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let blocks = self
            .ocr
            .detect_layout(data, OcrFeatures::TEXT)
            .map_err(|e| ocr_failed(MediaKind::Image, e))?;
        let text = self.layout.reconstruct(blocks);

        let chars = text.chars().count();
        if chars >= self.retry_min_chars {
            return Ok(text);
        }

        log::debug!(
            "Image OCR gave {} chars (< {}), retrying with tables and forms",
            chars,
            self.retry_min_chars
        );
        match self.ocr.detect_layout(data, OcrFeatures::TABLES_AND_FORMS) {
            Ok(blocks) => {
                let retry = self.layout.reconstruct(blocks);
                if retry.chars().count() > chars {
                    Ok(retry)
                } else {
                    Ok(text)
                }
            }
            Err(e) => {
                log::warn!("Structural image OCR retry failed, keeping first result: {}", e);
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendResult;
    use crate::model::Block;
    use std::sync::Mutex;

    /// Returns one LINE per call, taken from a queue; records features.
    struct ScriptedOcr {
        responses: Mutex<Vec<BackendResult<Vec<Block>>>>,
        requested: Mutex<Vec<OcrFeatures>>,
    }

    impl ScriptedOcr {
        fn new(responses: Vec<BackendResult<Vec<Block>>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    impl OcrProvider for ScriptedOcr {
        fn detect_layout(&self, _document: &[u8], features: OcrFeatures) -> BackendResult<Vec<Block>> {
            self.requested.lock().unwrap().push(features);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn line(text: &str) -> Vec<Block> {
        vec![
            Block::page("p1", 1).with_children(["l1"]),
            Block::line("l1", text),
        ]
    }

    #[test]
    fn test_pdf_requests_tables_and_forms() {
        let ocr = ScriptedOcr::new(vec![Ok(line("Invoice total: 42"))]);
        let extractor = PdfExtractor::new(ocr.clone(), LayoutReconstructor::default());
        assert_eq!(extractor.extract(b"%PDF-").unwrap(), "Invoice total: 42");
        assert_eq!(*ocr.requested.lock().unwrap(), vec![OcrFeatures::TABLES_AND_FORMS]);
    }

    #[test]
    fn test_pdf_ocr_failure_carries_cause() {
        let ocr = ScriptedOcr::new(vec![Err(BackendError::InvalidInput("encrypted".into()))]);
        let extractor = PdfExtractor::new(ocr, LayoutReconstructor::default());
        match extractor.extract(b"%PDF-").unwrap_err() {
            Error::Extraction { cause, .. } => {
                assert_eq!(cause, Some(BackendError::InvalidInput("encrypted".into())));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_image_long_text_no_retry() {
        let long = "word ".repeat(30);
        let ocr = ScriptedOcr::new(vec![Ok(line(&long))]);
        let extractor = ImageExtractor::new(ocr.clone(), LayoutReconstructor::default());
        assert_eq!(extractor.extract(b"img").unwrap(), long.trim());
        assert_eq!(ocr.requested.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_image_short_text_retries_and_keeps_longer() {
        let ocr = ScriptedOcr::new(vec![Ok(line("Name")), Ok(line("Name: Jane Doe"))]);
        let extractor = ImageExtractor::new(ocr.clone(), LayoutReconstructor::default());
        assert_eq!(extractor.extract(b"img").unwrap(), "Name: Jane Doe");
        assert_eq!(
            *ocr.requested.lock().unwrap(),
            vec![OcrFeatures::TEXT, OcrFeatures::TABLES_AND_FORMS]
        );
    }

    #[test]
    fn test_image_failed_retry_keeps_first() {
        let ocr = ScriptedOcr::new(vec![
            Ok(line("Short")),
            Err(BackendError::Throttled("later".into())),
        ]);
        let extractor = ImageExtractor::new(ocr, LayoutReconstructor::default())
            .with_retry_min_chars(50);
        assert_eq!(extractor.extract(b"img").unwrap(), "Short");
    }
}
