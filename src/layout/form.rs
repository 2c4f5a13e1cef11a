//! Rendering of KEY_VALUE_SET form fields.

use crate::model::{Block, BlockGraph, BlockType};

/// A resolved form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField<'a> {
    pub key: String,
    pub value: String,
    pub word_ids: Vec<&'a str>,
}

impl FormField<'_> {
    /// `"<prefix>: <key>: <value>"`.
    pub fn to_text(&self, prefix: &str) -> String {
        if self.value.is_empty() {
            format!("{}: {}:", prefix, self.key)
        } else {
            format!("{}: {}: {}", prefix, self.key, self.value)
        }
    }
}

/// Resolve a KEY block into a form field.
///
/// The key text comes from the block's CHILD words; the value text from the
/// CHILD words of the blocks its VALUE relationship points at. Returns
/// `None` for VALUE blocks and for keys without text.
pub fn resolve_form_field<'a>(graph: &'a BlockGraph, key: &'a Block) -> Option<FormField<'a>> {
    if !key.is_key() {
        return None;
    }

    let key_text = graph.child_words_text(key);
    if key_text.is_empty() {
        log::debug!("Form field {}: unresolved key, skipped", key.id);
        return None;
    }

    let mut word_ids: Vec<&str> = graph.child_word_ids(key).collect();
    let mut values = Vec::new();
    for value in graph
        .values(key)
        .filter(|b| b.block_type == BlockType::KeyValueSet)
    {
        let text = graph.child_words_text(value);
        if !text.is_empty() {
            values.push(text);
        }
        word_ids.extend(graph.child_word_ids(value));
    }

    Some(FormField {
        key: key_text,
        value: values.join(" "),
        word_ids,
    })
}
