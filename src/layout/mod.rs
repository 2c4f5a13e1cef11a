//! Reading-order text reconstruction from OCR blocks.
//!
//! Pages are processed in page-number order. Each page's LINE, TABLE and
//! KEY_VALUE_SET children are placed in visual reading order, then emitted:
//! lines as text, tables as delimited rows, form fields as
//! `"Form Field: <key>: <value>"`. The page texts are concatenated and
//! normalized.

mod form;
mod reading_order;
mod table;

pub use form::{resolve_form_field, FormField};
pub use reading_order::{group_into_rows, reading_order, same_row, VisualRow};
pub use table::{render_table, RenderedTable};

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::model::{Block, BlockGraph, BlockType};
use crate::text::TextNormalizer;

/// Options for layout reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Fraction of the taller block's height within which two tops count
    /// as the same visual row
    pub row_tolerance: f32,

    /// Separator between table fields
    pub cell_delimiter: String,

    /// Label written before each form field
    pub form_field_prefix: String,

    /// Skip LINE blocks whose words all belong to an emitted table or
    /// form field
    pub suppress_structured_lines: bool,
}

impl LayoutOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row tolerance.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Set the table field delimiter.
    pub fn with_cell_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.cell_delimiter = delimiter.into();
        self
    }

    /// Set the form field label.
    pub fn with_form_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.form_field_prefix = prefix.into();
        self
    }

    /// Enable or disable structured-line suppression.
    pub fn with_structured_line_suppression(mut self, enabled: bool) -> Self {
        self.suppress_structured_lines = enabled;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            row_tolerance: 0.01,
            cell_delimiter: " | ".to_string(),
            form_field_prefix: "Form Field".to_string(),
            suppress_structured_lines: true,
        }
    }
}

/// Turns OCR blocks into reading-order text.
#[derive(Debug, Clone, Default)]
pub struct LayoutReconstructor {
    options: LayoutOptions,
    normalizer: TextNormalizer,
}

impl LayoutReconstructor {
    /// Create a reconstructor with a default normalizer.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            normalizer: TextNormalizer::default(),
        }
    }

    /// Use a specific normalizer for the final pass.
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The options this reconstructor was built with.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Reconstruct normalized text from blocks.
    pub fn reconstruct(&self, blocks: Vec<Block>) -> String {
        let graph = BlockGraph::new(blocks);
        self.reconstruct_graph(&graph)
    }

    /// Reconstruct normalized text from an existing graph.
    pub fn reconstruct_graph(&self, graph: &BlockGraph) -> String {
        self.normalizer.normalize(&self.reconstruct_raw(graph))
    }

    /// Reconstruct text keeping line breaks, before normalization.
    pub fn reconstruct_raw(&self, graph: &BlockGraph) -> String {
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut pages = Vec::new();

        for (page_number, children) in page_contents(graph) {
            let text = self.render_page(graph, &children, &mut emitted);
            log::debug!(
                "Layout: page {} produced {} characters from {} blocks",
                page_number,
                text.len(),
                children.len()
            );
            if !text.is_empty() {
                pages.push(text);
            }
        }

        pages.join("\n")
    }

    fn render_page<'a>(
        &self,
        graph: &'a BlockGraph,
        children: &[&'a Block],
        emitted: &mut HashSet<&'a str>,
    ) -> String {
        let ordered = reading_order(children, self.options.row_tolerance);

        // Structured content is resolved first so lines that merely repeat
        // table or form words can be recognised.
        let mut tables = BTreeMap::new();
        let mut fields = BTreeMap::new();
        let mut claimed_words: HashSet<&str> = HashSet::new();
        for block in ordered.iter().copied() {
            match block.block_type {
                BlockType::Table => {
                    let rendered = render_table(graph, block, &self.options.cell_delimiter);
                    claimed_words.extend(rendered.word_ids.iter().copied());
                    tables.insert(block.id.as_str(), rendered);
                }
                BlockType::KeyValueSet => {
                    if let Some(field) = resolve_form_field(graph, block) {
                        claimed_words.extend(field.word_ids.iter().copied());
                        fields.insert(block.id.as_str(), field);
                    }
                }
                _ => {}
            }
        }

        let mut text = String::new();
        for block in ordered {
            if emitted.contains(block.id.as_str()) {
                continue;
            }
            match block.block_type {
                BlockType::Line => {
                    let line = block.text().trim();
                    if line.is_empty() {
                        continue;
                    }
                    if self.options.suppress_structured_lines
                        && is_structured_line(graph, block, &claimed_words)
                    {
                        log::debug!("Layout: line {} repeats table/form words, skipped", block.id);
                        continue;
                    }
                    text.push_str(line);
                    text.push('\n');
                }
                BlockType::Table => {
                    if let Some(rendered) = tables.get(block.id.as_str()) {
                        text.push_str(&rendered.to_text());
                    }
                }
                BlockType::KeyValueSet => {
                    if let Some(field) = fields.get(block.id.as_str()) {
                        text.push_str(&field.to_text(&self.options.form_field_prefix));
                        text.push('\n');
                    }
                }
                _ => continue,
            }
            emitted.insert(block.id.as_str());
        }

        text
    }
}

/// Whether a page-level block type is emitted directly.
fn is_page_content(block: &Block) -> bool {
    matches!(
        block.block_type,
        BlockType::Line | BlockType::Table | BlockType::KeyValueSet
    )
}

/// Page-level content blocks per page, in page order.
///
/// Uses PAGE blocks and their CHILD relationships when present; otherwise
/// groups all content blocks by their page number.
fn page_contents(graph: &BlockGraph) -> Vec<(u32, Vec<&Block>)> {
    let pages = graph.pages();
    if !pages.is_empty() {
        return pages
            .into_iter()
            .map(|page| {
                let children = graph
                    .children(page)
                    .filter(|b| is_page_content(b))
                    .collect();
                (page.page, children)
            })
            .collect();
    }

    log::debug!("Layout: no PAGE blocks, grouping content by page number");
    let mut by_page: BTreeMap<u32, Vec<&Block>> = BTreeMap::new();
    for block in graph.blocks().iter().filter(|b| is_page_content(b)) {
        by_page.entry(block.page).or_default().push(block);
    }
    by_page.into_iter().collect()
}

/// A LINE with WORD children that are all owned by structured content.
fn is_structured_line(graph: &BlockGraph, line: &Block, claimed: &HashSet<&str>) -> bool {
    if claimed.is_empty() {
        return false;
    }
    let mut words = graph.child_word_ids(line).peekable();
    if words.peek().is_none() {
        return false;
    }
    words.all(|id| claimed.contains(id))
}

/// Reconstruct normalized text with default options.
///
/// The default reconstructor is built once and shared.
pub fn reconstruct(blocks: Vec<Block>) -> String {
    static DEFAULT: OnceLock<LayoutReconstructor> = OnceLock::new();
    DEFAULT.get_or_init(LayoutReconstructor::default).reconstruct(blocks)
}
