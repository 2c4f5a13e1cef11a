//! Data model shared by the pipeline stages.
//!
//! OCR output enters as [`Block`]s indexed by a [`BlockGraph`]; sentence
//! features travel as [`SentenceAnalysis`]; the caller receives an
//! [`AnalysisResult`].

mod analysis;
mod block;
mod graph;
mod result;

pub use analysis::{AnalysisOutcome, SentenceAnalysis, Sentiment, SentimentResult, SentimentScore};
pub use block::{
    parse_blocks_json, Block, BlockType, BoundingBox, EntityType, Geometry, Relationship,
    RelationshipKind,
};
pub use graph::BlockGraph;
pub use result::{AnalysisRequest, AnalysisResult, AnalysisType, SummaryLength};
