//! Media type detection for uploaded documents.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Broad document category, deciding how text is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// PDF document, sent to OCR with table and form analysis
    Pdf,
    /// Raster image, sent to OCR
    Image,
    /// Plain text, decoded directly
    Text,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Pdf => write!(f, "pdf"),
            MediaKind::Image => write!(f, "image"),
            MediaKind::Text => write!(f, "text"),
        }
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";
const GIF_MAGIC: &[u8] = b"GIF8";
const TIFF_LE_MAGIC: &[u8] = b"II*\x00";
const TIFF_BE_MAGIC: &[u8] = b"MM\x00*";

/// Bytes read from a file header for sniffing.
const SNIFF_LEN: usize = 512;

/// Map a MIME type to a media kind.
///
/// Parameters such as `; charset=utf-8` are ignored.
pub fn media_kind_from_mime(mime: &str) -> Option<MediaKind> {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/pdf" | "application/x-pdf" => Some(MediaKind::Pdf),
        "text/plain" => Some(MediaKind::Text),
        m if m.starts_with("image/") => Some(MediaKind::Image),
        _ => None,
    }
}

/// Guess the media kind from leading bytes.
///
/// Binary signatures win; anything else that is valid UTF-8 is text.
pub fn sniff_media_kind(data: &[u8]) -> Option<MediaKind> {
    if data.starts_with(PDF_MAGIC) {
        return Some(MediaKind::Pdf);
    }
    if is_image_bytes(data) {
        return Some(MediaKind::Image);
    }
    if !data.is_empty() && looks_like_utf8(data) {
        return Some(MediaKind::Text);
    }
    None
}

/// Resolve the media kind of a document.
///
/// A recognised MIME type is trusted. Otherwise (missing, generic such as
/// `application/octet-stream`, or unknown) the bytes are sniffed.
pub fn detect_media_kind(data: &[u8], mime: Option<&str>) -> Result<MediaKind> {
    if let Some(kind) = mime.and_then(media_kind_from_mime) {
        return Ok(kind);
    }

    match sniff_media_kind(data) {
        Some(kind) => {
            log::debug!("Media type sniffed as {} (mime: {:?})", kind, mime);
            Ok(kind)
        }
        None => Err(Error::UnsupportedMediaType(
            mime.unwrap_or("unknown").to_string(),
        )),
    }
}

/// Resolve the media kind of a file from its header.
pub fn detect_media_kind_from_path<P: AsRef<Path>>(path: P) -> Result<MediaKind> {
    let mut header = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;
    detect_media_kind(&header, None)
}

/// Check whether bytes start with a known image signature.
pub fn is_image_bytes(data: &[u8]) -> bool {
    [PNG_MAGIC, JPEG_MAGIC, GIF_MAGIC, TIFF_LE_MAGIC, TIFF_BE_MAGIC]
        .iter()
        .any(|magic| data.starts_with(magic))
        || is_webp(data)
}

fn is_webp(data: &[u8]) -> bool {
    data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP"
}

/// UTF-8 check that tolerates a sequence cut off at the end of a header.
fn looks_like_utf8(data: &[u8]) -> bool {
    match std::str::from_utf8(data) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && data.len() - e.valid_up_to() < 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_mapping() {
        assert_eq!(media_kind_from_mime("application/pdf"), Some(MediaKind::Pdf));
        assert_eq!(media_kind_from_mime("IMAGE/PNG"), Some(MediaKind::Image));
        assert_eq!(media_kind_from_mime("image/webp"), Some(MediaKind::Image));
        assert_eq!(
            media_kind_from_mime("text/plain; charset=utf-8"),
            Some(MediaKind::Text)
        );
        assert_eq!(media_kind_from_mime("application/zip"), None);
    }

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(sniff_media_kind(b"%PDF-1.7\n"), Some(MediaKind::Pdf));
        assert_eq!(sniff_media_kind(b"\x89PNG\r\n\x1a\n...."), Some(MediaKind::Image));
        assert_eq!(sniff_media_kind(b"\xff\xd8\xff\xe0"), Some(MediaKind::Image));
        assert_eq!(sniff_media_kind(b"II*\x00rest"), Some(MediaKind::Image));
        assert_eq!(sniff_media_kind(b"RIFF\0\0\0\0WEBPVP8 "), Some(MediaKind::Image));
        assert_eq!(sniff_media_kind("Xin chào".as_bytes()), Some(MediaKind::Text));
        assert_eq!(sniff_media_kind(b"\x00\xff\xfe\x80"), None);
        assert_eq!(sniff_media_kind(b""), None);
    }

    #[test]
    fn test_truncated_utf8_header_is_text() {
        let text = "chà".as_bytes();
        assert!(looks_like_utf8(&text[..text.len() - 1]));
    }

    #[test]
    fn test_generic_mime_falls_back_to_sniffing() {
        let kind = detect_media_kind(b"%PDF-1.4", Some("application/octet-stream")).unwrap();
        assert_eq!(kind, MediaKind::Pdf);
    }

    #[test]
    fn test_unknown_media_rejected() {
        let err = detect_media_kind(b"\x00\x01\xfe\xff", Some("application/zip")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType(m) if m == "application/zip"));
    }

    #[test]
    fn test_detect_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"%PDF-1.7\n%binary").unwrap();
        assert_eq!(detect_media_kind_from_path(file.path()).unwrap(), MediaKind::Pdf);
    }
}
