//! Text normalization applied to reconstructed and raw document text.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Options for text normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Compose to Unicode NFC before filtering, so precomposed letters
    /// survive the character-class filter
    pub normalize_unicode: bool,

    /// Symbols kept in addition to letters, numbers, punctuation and
    /// whitespace (the default keeps the table cell delimiter)
    pub allowed_symbols: String,

    /// Force exactly one space after `.`, `!` and `?` when a word follows
    pub space_after_terminators: bool,
}

impl NormalizeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable NFC composition.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Set the extra symbols that survive filtering.
    pub fn with_allowed_symbols(mut self, symbols: impl Into<String>) -> Self {
        self.allowed_symbols = symbols.into();
        self
    }

    /// Enable or disable terminator spacing.
    pub fn with_terminator_spacing(mut self, enabled: bool) -> Self {
        self.space_after_terminators = enabled;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            allowed_symbols: "|".to_string(),
            space_after_terminators: true,
        }
    }
}

/// Cleans text into single-spaced, filtered form.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    options: NormalizeOptions,
    disallowed: Regex,
    terminator_gap: Regex,
}

impl TextNormalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        let extra: String = options
            .allowed_symbols
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let disallowed = Regex::new(&format!(r"[^\p{{L}}\p{{N}}\p{{P}}\s{}]+", extra))
            .expect("escaped character class is valid");
        // A terminator followed by optional whitespace and then a character
        // that starts a new word. Digits are excluded so "3.14" stays intact.
        let terminator_gap =
            Regex::new(r"([.!?])\s*([^\s\d.!?])").expect("terminator pattern is valid");

        Self {
            options,
            disallowed,
            terminator_gap,
        }
    }

    /// Normalize text.
    pub fn normalize(&self, text: &str) -> String {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        result = self.disallowed.replace_all(&result, " ").into_owned();

        if self.options.space_after_terminators {
            result = self.terminator_gap.replace_all(&result, "$1 $2").into_owned();
        }

        collapse_whitespace(&result)
    }

    /// The options this normalizer was built with.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

/// Collapse every whitespace run to one space and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize with default options.
///
/// The default normalizer is built once and shared.
pub fn normalize(text: &str) -> String {
    default_normalizer().normalize(text)
}

/// Process-wide normalizer with default options.
pub(crate) fn default_normalizer() -> &'static TextNormalizer {
    static DEFAULT: OnceLock<TextNormalizer> = OnceLock::new();
    DEFAULT.get_or_init(TextNormalizer::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_normalizer_is_shared() {
        assert!(std::ptr::eq(default_normalizer(), default_normalizer()));
        assert_eq!(normalize("a  b"), default_normalizer().normalize("a b"));
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  Hello \n\n  world!\t"), "Hello world!");
    }

    #[test]
    fn test_space_after_terminators() {
        assert_eq!(normalize("One.Two!Three?Four"), "One. Two! Three? Four");
        assert_eq!(normalize("End.   Next"), "End. Next");
    }

    #[test]
    fn test_decimals_survive() {
        assert_eq!(normalize("Pi is 3.14 roughly."), "Pi is 3.14 roughly.");
    }

    #[test]
    fn test_removes_symbols_but_keeps_delimiter() {
        assert_eq!(normalize("Cost $5 + tax ©"), "Cost 5 tax");
        assert_eq!(normalize("a | b | c"), "a | b | c");
    }

    #[test]
    fn test_custom_allowed_symbols() {
        let normalizer = TextNormalizer::new(NormalizeOptions::new().with_allowed_symbols("$+"));
        assert_eq!(normalizer.normalize("Cost $5 + tax | x"), "Cost $5 + tax x");
    }

    #[test]
    fn test_composes_vietnamese() {
        // "e" + combining circumflex + combining acute
        let decomposed = "Ti\u{0065}\u{0302}\u{0301}ng Vi\u{0065}\u{0323}\u{0302}t";
        assert_eq!(normalize(decomposed), "Tiếng Việt");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "Hello.World",
            "a...b",
            "Wait!?  What.\n\nOk",
            "Form Field: Name: John  Doe\nTable:\nA | B\n",
            "3.14. Next",
            "x .y . z",
            "¿Qué? ¡Sí! «quoted». 中文。测试",
            "emoji 🎉 and ™ symbols",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_without_terminator_spacing() {
        let normalizer = TextNormalizer::new(NormalizeOptions::new().with_terminator_spacing(false));
        assert_eq!(normalizer.normalize("One.Two"), "One.Two");
    }
}
