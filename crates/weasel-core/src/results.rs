// Per-word and per-block validation outcomes

use serde::Serialize;

// ---------------------------------------------------------------------------
// PreprocessedWord
// ---------------------------------------------------------------------------

/// One step of a preprocessing chain.
///
/// A preprocessor that declines to transform its input still produces a
/// step, with `preprocessed == false` and `preprocessed_word` equal to
/// `original_word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreprocessedWord {
    /// Name of the preprocessor that produced this step.
    pub preprocessor: String,
    /// Position of the preprocessor in the chain.
    pub preprocessor_order: u32,
    /// Input of this step.
    pub original_word: String,
    /// Output of this step.
    pub preprocessed_word: String,
    /// Whether the preprocessor transformed the word.
    pub preprocessed: bool,
}

impl PreprocessedWord {
    /// A step where the preprocessor transformed `original_word`.
    pub fn transformed(
        preprocessor: impl Into<String>,
        preprocessor_order: u32,
        original_word: impl Into<String>,
        preprocessed_word: impl Into<String>,
    ) -> Self {
        Self {
            preprocessor: preprocessor.into(),
            preprocessor_order,
            original_word: original_word.into(),
            preprocessed_word: preprocessed_word.into(),
            preprocessed: true,
        }
    }

    /// A pass-through step where the preprocessor did not apply.
    pub fn unchanged(
        preprocessor: impl Into<String>,
        preprocessor_order: u32,
        word: impl Into<String>,
    ) -> Self {
        let word = word.into();
        Self {
            preprocessor: preprocessor.into(),
            preprocessor_order,
            original_word: word.clone(),
            preprocessed_word: word,
            preprocessed: false,
        }
    }
}

// ---------------------------------------------------------------------------
// WordResults
// ---------------------------------------------------------------------------

/// Outcome of validating a single word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordResults {
    /// The word exactly as the caller supplied it.
    pub original_word: String,
    /// Preprocessing steps in the order they ran. Empty when no
    /// preprocessor was active.
    pub preprocessed_words: Vec<PreprocessedWord>,
    /// Names of the filters that matched the final word.
    pub filters_matched: Vec<String>,
    /// The final word was found in the dictionary as a cached invalid word.
    pub word_cached: bool,
    /// The final word was found in the dictionary as a valid word.
    pub word_valid: bool,
}

impl WordResults {
    /// Results for a word that was not preprocessed and matched no filter.
    pub fn new(original_word: impl Into<String>, word_cached: bool, word_valid: bool) -> Self {
        Self {
            original_word: original_word.into(),
            preprocessed_words: Vec::new(),
            filters_matched: Vec::new(),
            word_cached,
            word_valid,
        }
    }

    /// The word is acceptable: a filter matched it or the dictionary holds it.
    pub fn is_success(&self) -> bool {
        self.is_filter_match() || self.word_valid
    }

    pub fn is_filter_match(&self) -> bool {
        !self.filters_matched.is_empty()
    }

    /// At least one preprocessor transformed the word.
    pub fn is_preprocessed(&self) -> bool {
        self.preprocessed_words.iter().any(|p| p.preprocessed)
    }

    /// The word that filters and the dictionary lookup actually saw.
    pub fn final_word(&self) -> &str {
        self.preprocessed_words
            .last()
            .map_or(self.original_word.as_str(), |p| p.preprocessed_word.as_str())
    }
}

// ---------------------------------------------------------------------------
// BlockResults
// ---------------------------------------------------------------------------

/// Outcome of validating a block of text, one entry per unique token in
/// first-seen order.
///
/// Every reducer predicate returns `false` for an empty block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockResults {
    word_results: Vec<WordResults>,
}

impl BlockResults {
    pub fn new(word_results: Vec<WordResults>) -> Self {
        Self { word_results }
    }

    pub fn word_results(&self) -> &[WordResults] {
        &self.word_results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordResults> {
        self.word_results.iter()
    }

    pub fn len(&self) -> usize {
        self.word_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_results.is_empty()
    }

    fn all(&self, pred: impl Fn(&WordResults) -> bool) -> bool {
        !self.word_results.is_empty() && self.word_results.iter().all(pred)
    }

    pub fn is_success(&self) -> bool {
        self.all(WordResults::is_success)
    }

    pub fn is_filter_match(&self) -> bool {
        self.all(WordResults::is_filter_match)
    }

    pub fn is_preprocessed(&self) -> bool {
        self.all(WordResults::is_preprocessed)
    }

    pub fn is_word_cached(&self) -> bool {
        self.all(|r| r.word_cached)
    }

    pub fn is_word_valid(&self) -> bool {
        self.all(|r| r.word_valid)
    }

    /// The final word of each entry, in order.
    pub fn final_words(&self) -> Vec<&str> {
        self.word_results.iter().map(WordResults::final_word).collect()
    }

    pub fn into_inner(self) -> Vec<WordResults> {
        self.word_results
    }
}

impl IntoIterator for BlockResults {
    type Item = WordResults;
    type IntoIter = std::vec::IntoIter<WordResults>;

    fn into_iter(self) -> Self::IntoIter {
        self.word_results.into_iter()
    }
}

impl<'a> IntoIterator for &'a BlockResults {
    type Item = &'a WordResults;
    type IntoIter = std::slice::Iter<'a, WordResults>;

    fn into_iter(self) -> Self::IntoIter {
        self.word_results.iter()
    }
}
