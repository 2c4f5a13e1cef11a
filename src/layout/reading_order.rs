//! Reading-order sorting of page-level blocks.

use crate::model::Block;

/// A visual row of blocks, left to right.
#[derive(Debug, Clone)]
pub struct VisualRow<'a> {
    /// Top of the block that opened the row
    pub top: f32,
    /// Blocks in this row, sorted by left edge
    pub blocks: Vec<&'a Block>,
}

/// Whether two blocks sit on the same visual row:
/// `|top_a - top_b| < tolerance * max(height_a, height_b)`.
pub fn same_row(a: &Block, b: &Block, tolerance: f32) -> bool {
    let a_box = a.bounding_box();
    let b_box = b.bounding_box();
    let band = tolerance * a_box.height.max(b_box.height);
    (a_box.top - b_box.top).abs() < band
}

/// Group blocks into visual rows.
///
/// Blocks are sorted top to bottom, then swept into rows anchored at each
/// row's first block; every row is finally sorted by its left edge. This
/// gives the pairwise "same row → by left, otherwise by top" order with a
/// total comparator.
pub fn group_into_rows<'a>(blocks: &[&'a Block], tolerance: f32) -> Vec<VisualRow<'a>> {
    let mut sorted: Vec<&Block> = blocks.to_vec();
    sorted.sort_by(|a, b| {
        let (a_box, b_box) = (a.bounding_box(), b.bounding_box());
        a_box
            .top
            .total_cmp(&b_box.top)
            .then(a_box.left.total_cmp(&b_box.left))
    });

    let mut rows: Vec<VisualRow> = Vec::new();
    let mut anchor: Option<&Block> = None;

    for block in sorted {
        match anchor {
            Some(first) if same_row(first, block, tolerance) => {
                if let Some(row) = rows.last_mut() {
                    row.blocks.push(block);
                }
            }
            _ => {
                anchor = Some(block);
                rows.push(VisualRow {
                    top: block.bounding_box().top,
                    blocks: vec![block],
                });
            }
        }
    }

    for row in &mut rows {
        row.blocks
            .sort_by(|a, b| a.bounding_box().left.total_cmp(&b.bounding_box().left));
    }

    log::debug!(
        "ReadingOrder: {} blocks grouped into {} rows",
        blocks.len(),
        rows.len()
    );

    rows
}

/// Blocks in reading order.
pub fn reading_order<'a>(blocks: &[&'a Block], tolerance: f32) -> Vec<&'a Block> {
    group_into_rows(blocks, tolerance)
        .into_iter()
        .flat_map(|row| row.blocks)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(blocks: &[&'a Block]) -> Vec<&'a str> {
        blocks.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_top_to_bottom() {
        let lower = Block::line("lower", "b").at(0.5, 0.1, 0.2, 0.02);
        let upper = Block::line("upper", "a").at(0.1, 0.6, 0.2, 0.02);
        let ordered = reading_order(&[&lower, &upper], 0.01);
        assert_eq!(ids(&ordered), vec!["upper", "lower"]);
    }

    #[test]
    fn test_same_row_orders_by_left() {
        // Tops differ by less than 0.5 * 0.04 = 0.02
        let right = Block::line("right", "b").at(0.100, 0.6, 0.2, 0.04);
        let left = Block::line("left", "a").at(0.110, 0.1, 0.2, 0.04);
        let ordered = reading_order(&[&right, &left], 0.5);
        assert_eq!(ids(&ordered), vec!["left", "right"]);
    }

    #[test]
    fn test_outside_band_orders_by_top() {
        let right = Block::line("right", "b").at(0.100, 0.6, 0.2, 0.02);
        let left = Block::line("left", "a").at(0.110, 0.1, 0.2, 0.02);
        let ordered = reading_order(&[&left, &right], 0.01);
        assert_eq!(ids(&ordered), vec!["right", "left"]);
    }

    #[test]
    fn test_rows_are_grouped() {
        let a = Block::line("a", "a").at(0.10, 0.5, 0.1, 0.05);
        let b = Block::line("b", "b").at(0.11, 0.1, 0.1, 0.05);
        let c = Block::line("c", "c").at(0.40, 0.1, 0.1, 0.05);
        let rows = group_into_rows(&[&c, &a, &b], 0.5);
        assert_eq!(rows.len(), 2);
        assert_eq!(ids(&rows[0].blocks), vec!["b", "a"]);
        assert_eq!(ids(&rows[1].blocks), vec!["c"]);
    }

    #[test]
    fn test_zero_height_blocks_fall_back_to_position() {
        let a = Block::line("a", "a").at(0.2, 0.5, 0.1, 0.0);
        let b = Block::line("b", "b").at(0.2, 0.1, 0.1, 0.0);
        let ordered = reading_order(&[&a, &b], 0.01);
        assert_eq!(ids(&ordered), vec!["b", "a"]);
    }
}
