//! Sentence and line boundary splitting.

/// Whether `c` ends a sentence.
pub fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split text into sentence/line units.
///
/// A boundary is a terminator followed by whitespace, or a newline. Units
/// are trimmed and empty units are dropped; the terminator stays with its
/// sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '\n' {
            push_unit(&mut units, &text[start..i]);
            start = i + c.len_utf8();
            continue;
        }
        if is_terminator(c) {
            if let Some(&(next_i, next)) = chars.peek() {
                if next.is_whitespace() {
                    push_unit(&mut units, &text[start..next_i]);
                    start = next_i;
                }
            }
        }
    }
    push_unit(&mut units, &text[start..]);

    units
}

fn push_unit<'a>(units: &mut Vec<&'a str>, raw: &'a str) {
    let unit = raw.trim();
    if !unit.is_empty() {
        units.push(unit);
    }
}
