//! Serialization of TABLE blocks into delimited rows.

use std::collections::BTreeMap;

use crate::model::{Block, BlockGraph, BlockType};

/// Column indices above this many times the table's cell count are treated
/// as malformed.
const MAX_COLUMNS_PER_CELL: u32 = 4;

/// A table rendered as text, with the WORD ids its cells consumed.
#[derive(Debug, Clone, Default)]
pub struct RenderedTable<'a> {
    /// One string per row, fields joined by the delimiter
    pub rows: Vec<String>,
    pub word_ids: Vec<&'a str>,
}

impl RenderedTable<'_> {
    /// Rows joined by newlines, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }
}

/// Render a TABLE block.
///
/// Cells are the table's own CELL children, grouped by row index and
/// ordered by column index. Every row spans the table's full column range,
/// so a missing cell becomes an empty field instead of shifting columns.
pub fn render_table<'a>(graph: &'a BlockGraph, table: &'a Block, delimiter: &str) -> RenderedTable<'a> {
    let mut grid: BTreeMap<u32, BTreeMap<u32, String>> = BTreeMap::new();
    let mut word_ids = Vec::new();
    let mut min_column = u32::MAX;
    let mut max_column = 0;

    let cells: Vec<&Block> = graph
        .children(table)
        .filter(|b| b.block_type == BlockType::Cell)
        .collect();
    let column_limit = u32::try_from(cells.len())
        .unwrap_or(u32::MAX)
        .saturating_mul(MAX_COLUMNS_PER_CELL);

    for cell in cells {
        let (Some(row), Some(column)) = (cell.row_index, cell.column_index) else {
            log::warn!(
                "Table {}: cell {} has no row/column index, skipped",
                table.id,
                cell.id
            );
            continue;
        };
        if column > column_limit {
            log::warn!(
                "Table {}: cell {} has implausible column index {}, skipped",
                table.id,
                cell.id,
                column
            );
            continue;
        }

        let mut text = graph.child_words_text(cell);
        if text.is_empty() {
            text = cell.text().trim().to_string();
        }
        word_ids.extend(graph.child_word_ids(cell));

        min_column = min_column.min(column);
        max_column = max_column.max(column);
        grid.entry(row).or_default().insert(column, text);
    }

    if grid.is_empty() {
        log::debug!("Table {}: no cells", table.id);
        return RenderedTable::default();
    }

    let rows = grid
        .values()
        .map(|cells| {
            (min_column..=max_column)
                .map(|column| cells.get(&column).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(delimiter)
        })
        .collect();

    RenderedTable { rows, word_ids }
}
