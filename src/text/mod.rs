//! Plain-text stages: normalization, sentence splitting, chunking and
//! sentence similarity.

mod chunk;
mod normalize;
mod sentences;
mod similarity;

pub use chunk::{chunk_text, reassemble, Chunk, ChunkOptions, SizeUnit, TextChunker, CHUNK_SEPARATOR};
pub use normalize::{normalize, NormalizeOptions, TextNormalizer};
pub use sentences::{is_terminator, split_sentences};
pub use similarity::{jaccard, jaccard_similarity, word_set};
