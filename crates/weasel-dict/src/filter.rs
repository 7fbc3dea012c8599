// Word filters: classifiers that can accept a word without a dictionary lookup

use serde::{Deserialize, Serialize};

/// A togglable word classifier.
///
/// [`matches`](WordFilter::matches) is the pure classifier and ignores the
/// enabled flag; [`filter_match`](WordFilter::filter_match) is what the
/// dictionary calls and only matches while the filter is enabled.
pub trait WordFilter: Send + Sync {
    /// Stable name reported in `WordResults::filters_matched`.
    fn name(&self) -> &str;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn enable(&mut self) {
        self.set_enabled(true);
    }

    fn disable(&mut self) {
        self.set_enabled(false);
    }

    /// Does `word` belong to the class this filter recognizes?
    fn matches(&self, word: &str) -> bool;

    fn filter_match(&self, word: &str) -> bool {
        self.is_enabled() && self.matches(word)
    }
}

/// Built-in filter kinds, as named in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Numeric,
    Currency,
    SingleCharacter,
    NonWord,
}

impl FilterKind {
    /// Instantiate the built-in filter for this kind.
    pub fn build(self, enabled: bool) -> Box<dyn WordFilter> {
        match self {
            FilterKind::Numeric => Box::new(NumericFilter::new(enabled)),
            FilterKind::Currency => Box::new(CurrencyFilter::new(enabled)),
            FilterKind::SingleCharacter => Box::new(SingleCharacterWordFilter::new(enabled)),
            FilterKind::NonWord => Box::new(NonWordFilter::new(enabled)),
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric
// ---------------------------------------------------------------------------

/// Check for an unsigned integer or decimal number. Thousands separators are
/// accepted only in groups of three: `1,000,000.5` but not `10,00`.
fn is_unsigned_number(s: &str) -> bool {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };

    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }

    if int_part.is_empty() {
        return false;
    }

    if int_part.contains(',') {
        let mut groups = int_part.split(',');
        let first = groups.next().unwrap_or_default();
        if first.is_empty() || first.len() > 3 || !first.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
    } else {
        int_part.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Matches optionally signed integers and decimals: `42`, `-3.14`, `+1,000`.
#[derive(Debug, Clone)]
pub struct NumericFilter {
    enabled: bool,
}

impl NumericFilter {
    pub const NAME: &'static str = "numeric";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for NumericFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WordFilter for NumericFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn matches(&self, word: &str) -> bool {
        let unsigned = word
            .strip_prefix('-')
            .or_else(|| word.strip_prefix('+'))
            .unwrap_or(word);
        is_unsigned_number(unsigned)
    }
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

const CURRENCY_SYMBOLS: &[char] = &['$', '\u{20AC}', '\u{00A3}', '\u{00A5}'];

/// Matches amounts with a leading currency symbol: `$5`, `€1,200.50`.
#[derive(Debug, Clone)]
pub struct CurrencyFilter {
    enabled: bool,
}

impl CurrencyFilter {
    pub const NAME: &'static str = "currency";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for CurrencyFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WordFilter for CurrencyFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn matches(&self, word: &str) -> bool {
        let word = word.strip_prefix('-').unwrap_or(word);
        let mut chars = word.chars();
        match chars.next() {
            Some(c) if CURRENCY_SYMBOLS.contains(&c) => is_unsigned_number(chars.as_str()),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Single character
// ---------------------------------------------------------------------------

/// Matches the single-letter English words `a`, `A` and `I`.
#[derive(Debug, Clone)]
pub struct SingleCharacterWordFilter {
    enabled: bool,
}

impl SingleCharacterWordFilter {
    pub const NAME: &'static str = "single_character";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for SingleCharacterWordFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WordFilter for SingleCharacterWordFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn matches(&self, word: &str) -> bool {
        matches!(word, "a" | "A" | "I")
    }
}

// ---------------------------------------------------------------------------
// Non-word
// ---------------------------------------------------------------------------

/// Check whether a word looks like a URL or an e-mail address.
///
/// Patterns:
/// - `X*//X*.X+` (URL-like)
/// - `X*@X+.X+` (email-like)
/// - `www.X+.X+` (www prefix)
fn is_nonword(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let nchars = chars.len();
    if nchars < 4 {
        return false;
    }

    if let Some(slash_pos) = chars[..nchars - 3].iter().position(|&c| c == '/') {
        if chars[slash_pos + 1] == '/' && chars[slash_pos + 2..].contains(&'.') {
            return true;
        }
    }

    if let Some(at_pos) = chars.iter().position(|&c| c == '@') {
        if at_pos > 0 && chars[at_pos + 1..].contains(&'.') {
            return true;
        }
    }

    nchars >= 5
        && chars[..3].iter().all(|c| c.eq_ignore_ascii_case(&'w'))
        && chars[3] == '.'
        && chars[4..].contains(&'.')
}

/// Matches URLs and e-mail addresses.
#[derive(Debug, Clone)]
pub struct NonWordFilter {
    enabled: bool,
}

impl NonWordFilter {
    pub const NAME: &'static str = "non_word";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for NonWordFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WordFilter for NonWordFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn matches(&self, word: &str) -> bool {
        is_nonword(word)
    }
}
