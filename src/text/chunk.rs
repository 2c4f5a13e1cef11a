//! Size-bounded chunking for length-limited translation calls.

use serde::{Deserialize, Serialize};

use super::sentences::split_sentences;

/// Separator placed between units inside a chunk and between chunks on
/// reassembly.
pub const CHUNK_SEPARATOR: &str = " ";

/// How chunk length is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// Unicode scalar values
    #[default]
    Chars,
    /// UTF-8 bytes
    Bytes,
}

impl SizeUnit {
    /// Length of `text` in this unit.
    pub fn measure(self, text: &str) -> usize {
        match self {
            SizeUnit::Chars => text.chars().count(),
            SizeUnit::Bytes => text.len(),
        }
    }

    /// Smallest limit that fits any single character.
    pub fn min_chunk_size(self) -> usize {
        match self {
            SizeUnit::Chars => 1,
            SizeUnit::Bytes => 4,
        }
    }
}

/// Options for chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkOptions {
    /// Maximum chunk length in `size_unit`
    pub max_chunk_size: usize,

    /// Unit used to measure chunk length
    pub size_unit: SizeUnit,
}

impl ChunkOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum chunk size.
    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    /// Set the size unit.
    pub fn with_size_unit(mut self, unit: SizeUnit) -> Self {
        self.size_unit = unit;
        self
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: 4800,
            size_unit: SizeUnit::Chars,
        }
    }
}

/// One slice of text sized for a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

/// Splits text into chunks of at most `max_chunk_size` along sentence and
/// line boundaries.
#[derive(Debug, Clone, Default)]
pub struct TextChunker {
    options: ChunkOptions,
}

impl TextChunker {
    /// Create a chunker. A zero size is raised to 1.
    pub fn new(mut options: ChunkOptions) -> Self {
        options.max_chunk_size = options.max_chunk_size.max(1);
        Self { options }
    }

    /// Create a chunker measuring characters.
    pub fn with_max_size(max_chunk_size: usize) -> Self {
        Self::new(ChunkOptions::new().with_max_chunk_size(max_chunk_size))
    }

    /// The effective options.
    pub fn options(&self) -> &ChunkOptions {
        &self.options
    }

    /// Split `text` into ordered chunks.
    ///
    /// Units that fit are packed greedily; a unit longer than the limit is
    /// cut into consecutive fixed-size slices. Joining the chunks with
    /// [`CHUNK_SEPARATOR`] reproduces the units in order.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let max = self.options.max_chunk_size;
        let unit = self.options.size_unit;
        let separator_len = unit.measure(CHUNK_SEPARATOR);

        let mut pieces: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for sentence in split_sentences(text) {
            let len = unit.measure(sentence);

            if len > max {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                log::debug!(
                    "TextChunker: hard-splitting unit of {} into slices of {}",
                    len,
                    max
                );
                pieces.extend(hard_split(sentence, max, unit));
                continue;
            }

            if current.is_empty() {
                current.push_str(sentence);
                current_len = len;
            } else if current_len + separator_len + len <= max {
                current.push_str(CHUNK_SEPARATOR);
                current.push_str(sentence);
                current_len += separator_len + len;
            } else {
                pieces.push(std::mem::replace(&mut current, sentence.to_string()));
                current_len = len;
            }
        }

        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk { index, text })
            .collect()
    }
}

/// Cut `text` into consecutive slices of at most `max` units, always on
/// character boundaries. A single character wider than `max` bytes gets a
/// slice of its own.
fn hard_split(text: &str, max: usize, unit: SizeUnit) -> Vec<String> {
    let mut slices = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for c in text.chars() {
        let width = match unit {
            SizeUnit::Chars => 1,
            SizeUnit::Bytes => c.len_utf8(),
        };
        if current_len + width > max && !current.is_empty() {
            slices.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push(c);
        current_len += width;
    }
    if !current.is_empty() {
        slices.push(current);
    }

    slices
}

/// Chunk with default options and the given character limit.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<Chunk> {
    TextChunker::with_max_size(max_chunk_size).chunk(text)
}

/// Join chunk texts in index order.
pub fn reassemble(chunks: &[Chunk]) -> String {
    let mut ordered: Vec<&Chunk> = chunks.iter().collect();
    ordered.sort_by_key(|c| c.index);
    ordered
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_each_sentence_alone_under_tight_limit() {
        let chunks = chunk_text("A. B. C.", 4);
        assert_eq!(texts(&chunks), vec!["A.", "B.", "C."]);
        assert_eq!(chunks.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_packs_sentences_greedily() {
        let chunks = chunk_text("A. B. C.", 5);
        assert_eq!(texts(&chunks), vec!["A. B.", "C."]);
    }

    #[test]
    fn test_hard_splits_oversized_sentence() {
        let chunks = chunk_text("Short. abcdefghij Tail.", 4);
        assert_eq!(
            texts(&chunks),
            vec!["Shor", "t.", "abcd", "efgh", "ij T", "ail."]
        );
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 4));
    }

    #[test]
    fn test_oversized_unit_flushes_accumulator() {
        let chunks = chunk_text("Hi. Supercalifragilistic. Yo.", 10);
        assert_eq!(
            texts(&chunks),
            vec!["Hi.", "Supercalif", "ragilistic", ".", "Yo."]
        );
    }

    #[test]
    fn test_byte_unit_respects_char_boundaries() {
        let chunker = TextChunker::new(
            ChunkOptions::new()
                .with_max_chunk_size(5)
                .with_size_unit(SizeUnit::Bytes),
        );
        let chunks = chunker.chunk("ééééé");
        assert_eq!(texts(&chunks), vec!["éé", "éé", "é"]);
        assert!(chunks.iter().all(|c| c.text.len() <= 5));
    }

    #[test]
    fn test_zero_limit_is_raised() {
        let chunker = TextChunker::with_max_size(0);
        assert_eq!(chunker.options().max_chunk_size, 1);
        assert_eq!(texts(&chunker.chunk("ab")), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk_text("", 10).is_empty());
    }

    #[test]
    fn test_reassemble_restores_normalized_text() {
        let text = "First sentence here. Second one is a bit longer! Third? Fourth.";
        for max in [1, 3, 8, 20, 64, 1000] {
            let chunks = chunk_text(text, max);
            assert!(chunks.iter().all(|c| c.text.chars().count() <= max));
            if max >= 27 {
                assert_eq!(reassemble(&chunks), text);
            }
        }
    }
}
