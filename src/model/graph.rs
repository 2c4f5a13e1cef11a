//! Read-only id-indexed view over one document's OCR blocks.

use std::collections::HashMap;

use super::block::{Block, BlockType, RelationshipKind};

/// Owns every block of one document and resolves relationships by id.
///
/// Relationships are followed through the index rather than stored as
/// references, so the graph has no ownership cycles.
#[derive(Debug, Clone, Default)]
pub struct BlockGraph {
    blocks: Vec<Block>,
    index: HashMap<String, usize>,
}

impl BlockGraph {
    /// Build the graph. On duplicate ids the first block wins.
    pub fn new(blocks: Vec<Block>) -> Self {
        let mut index = HashMap::with_capacity(blocks.len());
        for (position, block) in blocks.iter().enumerate() {
            if index.contains_key(&block.id) {
                log::warn!("BlockGraph: duplicate block id {}, keeping first", block.id);
                continue;
            }
            index.insert(block.id.clone(), position);
        }
        Self { blocks, index }
    }

    /// Look up a block by id.
    pub fn get(&self, id: &str) -> Option<&Block> {
        self.index.get(id).map(|&position| &self.blocks[position])
    }

    /// All blocks in provider order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the graph holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks of one type, in provider order.
    pub fn of_type(&self, block_type: BlockType) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |b| b.block_type == block_type)
    }

    /// PAGE blocks sorted by page number (stable for equal numbers).
    pub fn pages(&self) -> Vec<&Block> {
        let mut pages: Vec<&Block> = self.of_type(BlockType::Page).collect();
        pages.sort_by_key(|p| p.page);
        pages
    }

    /// Resolve the ids of one relationship kind. Dangling ids are skipped.
    pub fn related<'a>(
        &'a self,
        block: &'a Block,
        kind: RelationshipKind,
    ) -> impl Iterator<Item = &'a Block> + 'a {
        block.related_ids(kind).filter_map(move |id| {
            let found = self.get(id);
            if found.is_none() {
                log::debug!("BlockGraph: {} references missing block {}", block.id, id);
            }
            found
        })
    }

    /// Direct CHILD blocks.
    pub fn children<'a>(&'a self, block: &'a Block) -> impl Iterator<Item = &'a Block> + 'a {
        self.related(block, RelationshipKind::Child)
    }

    /// Blocks referenced through VALUE.
    pub fn values<'a>(&'a self, block: &'a Block) -> impl Iterator<Item = &'a Block> + 'a {
        self.related(block, RelationshipKind::Value)
    }

    /// Text of a block's WORD children joined by single spaces.
    pub fn child_words_text(&self, block: &Block) -> String {
        self.children(block)
            .filter(|c| c.block_type == BlockType::Word)
            .map(Block::text)
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Ids of a block's WORD children.
    pub fn child_word_ids<'a>(&'a self, block: &'a Block) -> impl Iterator<Item = &'a str> + 'a {
        self.children(block)
            .filter(|c| c.block_type == BlockType::Word)
            .map(|c| c.id.as_str())
    }
}

impl From<Vec<Block>> for BlockGraph {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BlockGraph {
        BlockGraph::new(vec![
            Block::page("p2", 2).with_children(["l2"]),
            Block::page("p1", 1).with_children(["l1", "missing"]),
            Block::line("l1", "first").with_children(["w1", "w2"]),
            Block::line("l2", "second"),
            Block::word("w1", "fir"),
            Block::word("w2", "st"),
        ])
    }

    #[test]
    fn test_lookup_by_id() {
        let graph = sample();
        assert_eq!(graph.len(), 6);
        assert_eq!(graph.get("l2").map(Block::text), Some("second"));
        assert!(graph.get("nope").is_none());
    }

    #[test]
    fn test_pages_sorted_by_number() {
        let graph = sample();
        let ids: Vec<_> = graph.pages().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_dangling_children_are_skipped() {
        let graph = sample();
        let page = graph.get("p1").unwrap();
        let children: Vec<_> = graph.children(page).map(|b| b.id.as_str()).collect();
        assert_eq!(children, vec!["l1"]);
    }

    #[test]
    fn test_child_words_text() {
        let graph = sample();
        let line = graph.get("l1").unwrap();
        assert_eq!(graph.child_words_text(line), "fir st");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let graph = BlockGraph::new(vec![Block::line("a", "one"), Block::line("a", "two")]);
        assert_eq!(graph.get("a").map(Block::text), Some("one"));
    }
}
