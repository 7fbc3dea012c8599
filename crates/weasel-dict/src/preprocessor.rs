// Word preprocessors: ordered transformations applied before filtering and lookup

use serde::{Deserialize, Serialize};
use weasel_core::PreprocessedWord;

/// A togglable word transformation.
///
/// [`transform`](WordPreprocessor::transform) is the pure transformation.
/// [`preprocess`](WordPreprocessor::preprocess) is the gated wrapper the
/// dictionary calls: it transforms only when the preprocessor is enabled and
/// the word [meets its criteria](WordPreprocessor::meets_criteria), and
/// records a pass-through step otherwise.
pub trait WordPreprocessor: Send + Sync {
    /// Stable name reported in `PreprocessedWord::preprocessor`.
    fn name(&self) -> &str;

    /// Position in the chain; lower orders run first.
    fn order(&self) -> u32;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn enable(&mut self) {
        self.set_enabled(true);
    }

    fn disable(&mut self) {
        self.set_enabled(false);
    }

    /// Whether the transformation applies to `word` at all.
    fn meets_criteria(&self, _word: &str) -> bool {
        true
    }

    fn transform(&self, word: &str) -> String;

    fn preprocess(&self, word: &str) -> PreprocessedWord {
        if self.is_enabled() && self.meets_criteria(word) {
            PreprocessedWord::transformed(self.name(), self.order(), word, self.transform(word))
        } else {
            PreprocessedWord::unchanged(self.name(), self.order(), word)
        }
    }
}

/// Built-in preprocessor kinds, as named in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreprocessorKind {
    Downcase,
    TrailingDot,
    Normalize,
}

impl PreprocessorKind {
    /// Instantiate the built-in preprocessor for this kind.
    pub fn build(self, order: u32, enabled: bool) -> Box<dyn WordPreprocessor> {
        match self {
            PreprocessorKind::Downcase => Box::new(DowncasePreprocessor::new(order, enabled)),
            PreprocessorKind::TrailingDot => Box::new(TrailingDotPreprocessor::new(order, enabled)),
            PreprocessorKind::Normalize => Box::new(NormalizePreprocessor::new(order, enabled)),
        }
    }
}

// ---------------------------------------------------------------------------
// Downcase
// ---------------------------------------------------------------------------

/// Lower-cases the word. Declines words that have no upper-case letters.
#[derive(Debug, Clone)]
pub struct DowncasePreprocessor {
    order: u32,
    enabled: bool,
}

impl DowncasePreprocessor {
    pub const NAME: &'static str = "downcase";

    pub fn new(order: u32, enabled: bool) -> Self {
        Self { order, enabled }
    }
}

impl Default for DowncasePreprocessor {
    fn default() -> Self {
        Self::new(0, true)
    }
}

impl WordPreprocessor for DowncasePreprocessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn meets_criteria(&self, word: &str) -> bool {
        word.chars().any(char::is_uppercase)
    }

    fn transform(&self, word: &str) -> String {
        word.to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// Trailing dot
// ---------------------------------------------------------------------------

/// Strips a single trailing `.` so that `end.` is looked up as `end`.
/// A lone `.` is left alone.
#[derive(Debug, Clone)]
pub struct TrailingDotPreprocessor {
    order: u32,
    enabled: bool,
}

impl TrailingDotPreprocessor {
    pub const NAME: &'static str = "trailing_dot";

    pub fn new(order: u32, enabled: bool) -> Self {
        Self { order, enabled }
    }
}

impl Default for TrailingDotPreprocessor {
    fn default() -> Self {
        Self::new(0, true)
    }
}

impl WordPreprocessor for TrailingDotPreprocessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn meets_criteria(&self, word: &str) -> bool {
        word.len() > 1 && word.ends_with('.')
    }

    fn transform(&self, word: &str) -> String {
        word.strip_suffix('.').unwrap_or(word).to_string()
    }
}

// ---------------------------------------------------------------------------
// Normalize
// ---------------------------------------------------------------------------

/// Replacement text for characters the normalizer rewrites.
fn normalized(c: char) -> Option<&'static str> {
    match c {
        // HYPHEN, NON-BREAKING HYPHEN
        '\u{2010}' | '\u{2011}' => Some("-"),
        '\u{FB00}' => Some("ff"),
        '\u{FB01}' => Some("fi"),
        '\u{FB02}' => Some("fl"),
        '\u{FB03}' => Some("ffi"),
        '\u{FB04}' => Some("ffl"),
        // DEGREE CELSIUS, DEGREE FAHRENHEIT
        '\u{2103}' => Some("\u{00B0}C"),
        '\u{2109}' => Some("\u{00B0}F"),
        _ => None,
    }
}

/// Rewrites Unicode hyphen variants to `-` and decomposes Latin ligatures.
#[derive(Debug, Clone)]
pub struct NormalizePreprocessor {
    order: u32,
    enabled: bool,
}

impl NormalizePreprocessor {
    pub const NAME: &'static str = "normalize";

    pub fn new(order: u32, enabled: bool) -> Self {
        Self { order, enabled }
    }
}

impl Default for NormalizePreprocessor {
    fn default() -> Self {
        Self::new(0, true)
    }
}

impl WordPreprocessor for NormalizePreprocessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn meets_criteria(&self, word: &str) -> bool {
        word.chars().any(|c| normalized(c).is_some())
    }

    fn transform(&self, word: &str) -> String {
        let mut result = String::with_capacity(word.len());
        for c in word.chars() {
            match normalized(c) {
                Some(replacement) => result.push_str(replacement),
                None => result.push(c),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcase_transforms_mixed_case() {
        let p = DowncasePreprocessor::default();
        let step = p.preprocess("ApPlE");
        assert!(step.preprocessed);
        assert_eq!(step.original_word, "ApPlE");
        assert_eq!(step.preprocessed_word, "apple");
        assert_eq!(step.preprocessor, "downcase");
    }

    #[test]
    fn downcase_declines_lowercase_word() {
        let p = DowncasePreprocessor::default();
        let step = p.preprocess("apple");
        assert!(!step.preprocessed);
        assert_eq!(step.preprocessed_word, "apple");
    }

    #[test]
    fn disabled_preprocessor_passes_through() {
        let mut p = DowncasePreprocessor::default();
        p.disable();
        let step = p.preprocess("APPLE");
        assert!(!step.preprocessed);
        assert_eq!(step.preprocessed_word, "APPLE");
        // The pure transformation is unaffected.
        assert_eq!(p.transform("APPLE"), "apple");
    }

    #[test]
    fn trailing_dot_is_stripped_once() {
        let p = TrailingDotPreprocessor::default();
        assert_eq!(p.preprocess("end.").preprocessed_word, "end");
        assert_eq!(p.preprocess("etc..").preprocessed_word, "etc.");
        assert!(!p.preprocess(".").preprocessed);
        assert!(!p.preprocess("end").preprocessed);
    }

    #[test]
    fn normalize_hyphens_and_ligatures() {
        let p = NormalizePreprocessor::default();
        assert_eq!(p.transform("e\u{2010}mail"), "e-mail");
        assert_eq!(p.transform("\u{FB01}ne"), "fine");
        assert_eq!(p.transform("o\u{FB03}ce"), "office");
        assert_eq!(p.transform("20\u{2103}"), "20\u{00B0}C");
        assert!(!p.preprocess("plain").preprocessed);
    }

    #[test]
    fn kind_builds_with_order() {
        let p = PreprocessorKind::TrailingDot.build(3, true);
        assert_eq!(p.name(), "trailing_dot");
        assert_eq!(p.order(), 3);
        assert_eq!(p.preprocess("x.").preprocessor_order, 3);
    }
}
