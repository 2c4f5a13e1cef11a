//! Plain text documents.

use crate::detect::MediaKind;
use crate::error::Result;
use crate::text::TextNormalizer;

use super::TextExtractor;

/// Decodes UTF-8 text (invalid sequences replaced) and normalizes it.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor {
    normalizer: TextNormalizer,
}

impl PlainTextExtractor {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "text"
    }

    fn media_kinds(&self) -> &[MediaKind] {
        &[MediaKind::Text]
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let data = data.strip_prefix(b"\xef\xbb\xbf").unwrap_or(data);
        let decoded = String::from_utf8_lossy(data);
        Ok(self.normalizer.normalize(&decoded))
    }
}
