//! OCR block types.
//!
//! Field names follow the Textract JSON response layout (PascalCase,
//! geometry nested under `Geometry.BoundingBox`) so recorded responses
//! deserialize directly.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind of OCR primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    Table,
    Cell,
    KeyValueSet,
    /// Anything else the provider emits (selection marks, merged cells, ...)
    #[serde(other)]
    Other,
}

/// Role of a KEY_VALUE_SET block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Key,
    Value,
    #[serde(other)]
    Other,
}

/// Relationship kind between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    Child,
    Value,
    #[serde(other)]
    Other,
}

/// Directed edge set from one block to others, by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    #[serde(rename = "Type")]
    pub kind: RelationshipKind,
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Relationship {
    /// Create a CHILD relationship.
    pub fn child<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: RelationshipKind::Child,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a VALUE relationship.
    pub fn value<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: RelationshipKind::Value,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Axis-aligned box in page-relative coordinates (0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// Geometry wrapper as it appears in OCR responses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    #[serde(default)]
    pub bounding_box: BoundingBox,
}

fn default_page() -> u32 {
    1
}

/// One OCR-detected primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    pub id: String,

    pub block_type: BlockType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub geometry: Geometry,

    /// 1-based page number. Single-page responses omit it.
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// Row of a CELL block (1-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,

    /// Column of a CELL block (1-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<u32>,

    /// KEY or VALUE for KEY_VALUE_SET blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_types: Vec<EntityType>,
}

impl Block {
    /// Create a block with no text, geometry or relationships.
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            text: None,
            geometry: Geometry::default(),
            page: 1,
            relationships: Vec::new(),
            row_index: None,
            column_index: None,
            entity_types: Vec::new(),
        }
    }

    /// Create a PAGE block.
    pub fn page(id: impl Into<String>, page: u32) -> Self {
        Self::new(id, BlockType::Page).on_page(page)
    }

    /// Create a LINE block.
    pub fn line(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Line).with_text(text)
    }

    /// Create a WORD block.
    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Word).with_text(text)
    }

    /// Create a TABLE block.
    pub fn table(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::Table)
    }

    /// Create a CELL block at (row, column).
    pub fn cell(id: impl Into<String>, row: u32, column: u32) -> Self {
        let mut block = Self::new(id, BlockType::Cell);
        block.row_index = Some(row);
        block.column_index = Some(column);
        block
    }

    /// Create the KEY half of a form field.
    pub fn key(id: impl Into<String>) -> Self {
        let mut block = Self::new(id, BlockType::KeyValueSet);
        block.entity_types = vec![EntityType::Key];
        block
    }

    /// Create the VALUE half of a form field.
    pub fn value(id: impl Into<String>) -> Self {
        let mut block = Self::new(id, BlockType::KeyValueSet);
        block.entity_types = vec![EntityType::Value];
        block
    }

    /// Set the text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the page number.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the bounding box.
    pub fn at(mut self, top: f32, left: f32, width: f32, height: f32) -> Self {
        self.geometry.bounding_box = BoundingBox::new(top, left, width, height);
        self
    }

    /// Add CHILD ids.
    pub fn with_children<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.relationships.push(Relationship::child(ids));
        self
    }

    /// Add VALUE ids.
    pub fn with_values<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.relationships.push(Relationship::value(ids));
        self
    }

    /// Bounding box of this block.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.geometry.bounding_box
    }

    /// Text content, empty if absent.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Ids reachable through relationships of the given kind, in order.
    pub fn related_ids(&self, kind: RelationshipKind) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .filter(move |r| r.kind == kind)
            .flat_map(|r| r.ids.iter().map(String::as_str))
    }

    /// Whether this is the KEY half of a form field.
    pub fn is_key(&self) -> bool {
        self.block_type == BlockType::KeyValueSet && self.entity_types.contains(&EntityType::Key)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BlocksPayload {
    Response {
        #[serde(rename = "Blocks")]
        blocks: Vec<Block>,
    },
    Bare(Vec<Block>),
}

/// Parse an OCR response: either `{"Blocks": [...]}` or a bare block array.
pub fn parse_blocks_json(data: &[u8]) -> Result<Vec<Block>> {
    let payload: BlocksPayload = serde_json::from_slice(data)?;
    Ok(match payload {
        BlocksPayload::Response { blocks } => blocks,
        BlocksPayload::Bare(blocks) => blocks,
    })
}
