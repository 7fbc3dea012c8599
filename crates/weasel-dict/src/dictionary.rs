// Dictionary: the word validation pipeline
//
// For every word: active preprocessors in order, then the first matching
// filter, then a word-map lookup whose outcome is reported to the record's
// metadata (which may cache a miss). The lookup runs under the record's read
// lock; the write lock is only taken when some metadata observer wants the
// outcome, and the lookup is repeated under it so a concurrent cache write
// is never counted twice.

use std::sync::Arc;

use parking_lot::RwLock;
use weasel_core::{BlockResults, DictionaryKey, PreprocessedWord, WordResults};

use crate::config::DictionaryConfig;
use crate::error::{DictionaryError, Result};
use crate::filter::WordFilter;
use crate::loader::{DictionarySource, dedup_words};
use crate::metadata::{DictionaryMetadata, InvalidWordsStats};
use crate::preprocessor::WordPreprocessor;
use crate::record::{DictionaryRecord, Lookup, RecordId, SharedRecord};
use crate::tokenizer::unique_tokens;

/// A handle for validating words against one dictionary record.
///
/// Handles returned by the registry for aliased keys share the same record,
/// so they see the same words and the same invalid-word cache. Filters and
/// preprocessors belong to the handle.
pub struct Dictionary {
    key: DictionaryKey,
    record: SharedRecord,
    filters: Vec<Box<dyn WordFilter>>,
    preprocessors: Vec<Box<dyn WordPreprocessor>>,
}

impl Dictionary {
    /// Wrap a shared record with the configuration's default filters and
    /// preprocessors.
    pub(crate) fn new(key: DictionaryKey, record: SharedRecord, config: &DictionaryConfig) -> Self {
        let mut preprocessors = config.build_preprocessors();
        preprocessors.sort_by_key(|p| p.order());
        Self {
            key,
            record,
            filters: config.build_filters(),
            preprocessors,
        }
    }

    /// Build a standalone, loaded dictionary from a word list, outside any
    /// registry. Duplicate words are ignored.
    pub fn from_words<I, S>(key: DictionaryKey, words: I, config: &DictionaryConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut record = DictionaryRecord::new(
            RecordId(0),
            DictionarySource::memory(key.to_string()),
            DictionaryMetadata::with_invalid_words_budget(config.max_invalid_words_bytesize),
        );
        record.load_words(dedup_words(words));
        Self::new(key, Arc::new(RwLock::new(record)), config)
    }

    pub fn key(&self) -> &DictionaryKey {
        &self.key
    }

    pub fn record_id(&self) -> RecordId {
        self.record.read().id()
    }

    pub fn is_loaded(&self) -> bool {
        self.record.read().is_loaded()
    }

    /// Number of words from the dictionary source.
    pub fn word_count(&self) -> usize {
        self.record.read().word_count()
    }

    pub fn invalid_words_stats(&self) -> Option<InvalidWordsStats> {
        self.record
            .read()
            .metadata()
            .invalid_words()
            .map(|m| m.stats())
    }

    /// Rebuild the record's metadata from its current word map.
    pub fn refresh(&self) {
        self.record.write().refresh();
    }

    /// Run exclusive access on the underlying record. Edits to the word map
    /// should be followed by [`DictionaryRecord::refresh`].
    pub fn with_record_mut<R>(&self, f: impl FnOnce(&mut DictionaryRecord) -> R) -> R {
        f(&mut *self.record.write())
    }

    // =========================================================================
    // Filters and preprocessors
    // =========================================================================

    pub fn filters(&self) -> &[Box<dyn WordFilter>] {
        &self.filters
    }

    pub fn preprocessors(&self) -> &[Box<dyn WordPreprocessor>] {
        &self.preprocessors
    }

    pub fn filter_mut(&mut self, name: &str) -> Option<&mut (dyn WordFilter + 'static)> {
        self.filters
            .iter_mut()
            .find(|f| f.name() == name)
            .map(|f| f.as_mut())
    }

    pub fn preprocessor_mut(&mut self, name: &str) -> Option<&mut (dyn WordPreprocessor + 'static)> {
        self.preprocessors
            .iter_mut()
            .find(|p| p.name() == name)
            .map(|p| p.as_mut())
    }

    /// Append a filter. Filters are evaluated in the order they were added.
    pub fn add_filter(&mut self, filter: Box<dyn WordFilter>) -> Result<()> {
        if filter.name().is_empty() {
            return Err(DictionaryError::InvalidArgument(
                "filter name must not be empty".into(),
            ));
        }
        if self.filters.iter().any(|f| f.name() == filter.name()) {
            return Err(DictionaryError::InvalidArgument(format!(
                "filter {:?} is already attached",
                filter.name()
            )));
        }
        tracing::debug!(key = %self.key, filter = filter.name(), "added word filter");
        self.filters.push(filter);
        Ok(())
    }

    /// Insert a preprocessor at the position given by its order.
    pub fn add_preprocessor(&mut self, preprocessor: Box<dyn WordPreprocessor>) -> Result<()> {
        if preprocessor.name().is_empty() {
            return Err(DictionaryError::InvalidArgument(
                "preprocessor name must not be empty".into(),
            ));
        }
        if let Some(existing) = self
            .preprocessors
            .iter()
            .find(|p| p.name() == preprocessor.name() || p.order() == preprocessor.order())
        {
            return Err(DictionaryError::InvalidArgument(format!(
                "preprocessor {:?} (order {}) conflicts with attached preprocessor {:?} (order {})",
                preprocessor.name(),
                preprocessor.order(),
                existing.name(),
                existing.order()
            )));
        }
        tracing::debug!(
            key = %self.key,
            preprocessor = preprocessor.name(),
            order = preprocessor.order(),
            "added word preprocessor"
        );
        let index = self
            .preprocessors
            .partition_point(|p| p.order() < preprocessor.order());
        self.preprocessors.insert(index, preprocessor);
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn clear_preprocessors(&mut self) {
        self.preprocessors.clear();
    }

    /// Enable or disable every attached filter.
    pub fn set_filters_on(&mut self, on: bool) {
        for filter in &mut self.filters {
            filter.set_enabled(on);
        }
    }

    /// Enable or disable every attached preprocessor.
    pub fn set_preprocessors_on(&mut self, on: bool) {
        for preprocessor in &mut self.preprocessors {
            preprocessor.set_enabled(on);
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a single word.
    ///
    /// Fails with [`DictionaryError::NotLoaded`] when the record's word map
    /// has been unloaded.
    pub fn word_results(&self, word: &str) -> Result<WordResults> {
        let preprocessed_words = self.preprocess(word);
        let final_word = preprocessed_words
            .last()
            .map_or(word, |p| p.preprocessed_word.as_str());

        let filters_matched: Vec<String> = self
            .filters
            .iter()
            .find(|f| f.filter_match(final_word))
            .map(|f| vec![f.name().to_string()])
            .unwrap_or_default();

        let lookup = self.search(final_word)?;

        Ok(WordResults {
            original_word: word.to_string(),
            preprocessed_words,
            filters_matched,
            word_cached: lookup.found && !lookup.valid,
            word_valid: lookup.found && lookup.valid,
        })
    }

    /// Validate every unique token of a block of text. Tokens are split on
    /// whitespace outside double quotes; repeated tokens are validated once.
    pub fn block_results(&self, text: &str) -> Result<BlockResults> {
        let word_results = unique_tokens(text)
            .iter()
            .map(|token| self.word_results(token))
            .collect::<Result<Vec<_>>>()?;
        Ok(BlockResults::new(word_results))
    }

    /// Run the active preprocessors in order, feeding each one the previous
    /// step's output.
    fn preprocess(&self, word: &str) -> Vec<PreprocessedWord> {
        let mut steps: Vec<PreprocessedWord> = Vec::new();
        for preprocessor in self.preprocessors.iter().filter(|p| p.is_enabled()) {
            let input = steps
                .last()
                .map_or(word, |s: &PreprocessedWord| s.preprocessed_word.as_str());
            let step = preprocessor.preprocess(input);
            steps.push(step);
        }
        steps
    }

    /// Look `word` up and report the outcome to the record's metadata.
    fn search(&self, word: &str) -> Result<Lookup> {
        {
            let record = self.record.read();
            if !record.is_loaded() {
                return Err(DictionaryError::NotLoaded(self.key.to_string()));
            }
            let lookup = record.lookup(word);
            if !record.metadata().wants_word_search(lookup.found) {
                return Ok(lookup);
            }
        }

        let mut record = self.record.write();
        if !record.is_loaded() {
            return Err(DictionaryError::NotLoaded(self.key.to_string()));
        }
        let lookup = record.lookup(word);
        record.notify_word_search(word, lookup);
        Ok(lookup)
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("key", &self.key.to_string())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field(
                "preprocessors",
                &self.preprocessors.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::NumericFilter;
    use crate::preprocessor::{DowncasePreprocessor, TrailingDotPreprocessor};

    fn key() -> DictionaryKey {
        DictionaryKey::new("en", Some("US"), None).unwrap()
    }

    fn dictionary(words: &[&str]) -> Dictionary {
        Dictionary::from_words(key(), words.iter().copied(), &DictionaryConfig::default())
    }

    /// Filter with a fixed answer.
    struct FixedFilter {
        name: &'static str,
        answer: bool,
        enabled: bool,
    }

    impl FixedFilter {
        fn boxed(name: &'static str, answer: bool) -> Box<dyn WordFilter> {
            Box::new(Self {
                name,
                answer,
                enabled: true,
            })
        }
    }

    impl WordFilter for FixedFilter {
        fn name(&self) -> &str {
            self.name
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn matches(&self, _word: &str) -> bool {
            self.answer
        }
    }

    #[test]
    fn known_word_is_valid() {
        let dict = dictionary(&["apple"]);
        let r = dict.word_results("apple").unwrap();
        assert!(r.word_valid);
        assert!(!r.word_cached);
        assert!(r.is_success());
        assert!(r.preprocessed_words.is_empty());
        assert!(r.filters_matched.is_empty());
    }

    #[test]
    fn miss_is_reported_then_cached() {
        let dict = dictionary(&["apple"]);
        let first = dict.word_results("appel").unwrap();
        assert!(!first.word_valid);
        assert!(!first.word_cached);
        let second = dict.word_results("appel").unwrap();
        assert!(!second.word_valid);
        assert!(second.word_cached);
        assert_eq!(dict.invalid_words_stats().map(|s| s.used_bytes), Some(5));
    }

    #[test]
    fn downcase_preprocessor_makes_word_valid() {
        let mut dict = dictionary(&["apple"]);
        dict.add_preprocessor(Box::new(DowncasePreprocessor::default()))
            .unwrap();
        let r = dict.word_results("ApPlE").unwrap();
        assert_eq!(r.final_word(), "apple");
        assert_eq!(r.original_word, "ApPlE");
        assert!(r.word_valid);
        assert!(r.is_success());
    }

    #[test]
    fn preprocessors_chain_in_order() {
        let mut dict = dictionary(&["end"]);
        dict.add_preprocessor(Box::new(TrailingDotPreprocessor::new(1, true)))
            .unwrap();
        dict.add_preprocessor(Box::new(DowncasePreprocessor::new(0, true)))
            .unwrap();
        let r = dict.word_results("END.").unwrap();
        let names: Vec<&str> = r
            .preprocessed_words
            .iter()
            .map(|p| p.preprocessor.as_str())
            .collect();
        assert_eq!(names, vec!["downcase", "trailing_dot"]);
        assert_eq!(r.preprocessed_words[0].preprocessed_word, "end.");
        assert_eq!(r.preprocessed_words[1].original_word, "end.");
        assert_eq!(r.final_word(), "end");
        assert!(r.word_valid);
    }

    #[test]
    fn declining_preprocessor_is_recorded_as_unchanged() {
        let mut dict = dictionary(&["apple"]);
        dict.add_preprocessor(Box::new(DowncasePreprocessor::default()))
            .unwrap();
        let r = dict.word_results("apple").unwrap();
        assert_eq!(r.preprocessed_words.len(), 1);
        assert!(!r.preprocessed_words[0].preprocessed);
        assert!(!r.is_preprocessed());
        assert_eq!(r.final_word(), "apple");
    }

    #[test]
    fn disabled_preprocessors_are_skipped() {
        let mut dict = dictionary(&["apple"]);
        dict.add_preprocessor(Box::new(DowncasePreprocessor::default()))
            .unwrap();
        dict.set_preprocessors_on(false);
        assert!(dict.preprocessors().iter().all(|p| !p.is_enabled()));
        let r = dict.word_results("APPLE").unwrap();
        assert!(r.preprocessed_words.is_empty());
        assert!(!r.word_valid);
    }

    #[test]
    fn first_matching_filter_wins() {
        let mut dict = dictionary(&[]);
        dict.clear_filters();
        dict.add_filter(FixedFilter::boxed("f1", false)).unwrap();
        dict.add_filter(FixedFilter::boxed("f2", true)).unwrap();
        dict.add_filter(FixedFilter::boxed("f3", true)).unwrap();
        let r = dict.word_results("anything").unwrap();
        assert_eq!(r.filters_matched, vec!["f2"]);
        assert!(r.is_success());
        assert!(!r.word_valid);
    }

    #[test]
    fn filter_match_does_not_skip_lookup() {
        let dict = dictionary(&["42"]);
        let r = dict.word_results("42").unwrap();
        assert_eq!(r.filters_matched, vec!["numeric"]);
        assert!(r.word_valid);

        let r = dict.word_results("43").unwrap();
        assert!(r.is_success());
        assert!(!r.word_valid);
        // The miss still went through the cache.
        assert!(dict.word_results("43").unwrap().word_cached);
    }

    #[test]
    fn filters_off_disables_each_filter() {
        let mut dict = dictionary(&[]);
        dict.set_filters_on(false);
        assert!(dict.filters().iter().all(|f| !f.is_enabled()));
        assert!(!dict.word_results("42").unwrap().is_success());
        dict.set_filters_on(true);
        assert!(dict.word_results("42").unwrap().is_success());
    }

    #[test]
    fn filter_mut_toggles_one_filter() {
        let mut dict = dictionary(&[]);
        if let Some(f) = dict.filter_mut("numeric") {
            f.disable();
        }
        assert!(!dict.word_results("42").unwrap().is_success());
        assert!(dict.word_results("I").unwrap().is_success());
    }

    #[test]
    fn duplicate_filter_name_is_rejected() {
        let mut dict = dictionary(&[]);
        let err = dict
            .add_filter(Box::new(NumericFilter::default()))
            .unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidArgument(_)));
        let err = dict.add_filter(FixedFilter::boxed("", true)).unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidArgument(_)));
    }

    #[test]
    fn duplicate_preprocessor_order_is_rejected() {
        let mut dict = dictionary(&[]);
        dict.add_preprocessor(Box::new(DowncasePreprocessor::new(0, true)))
            .unwrap();
        let err = dict
            .add_preprocessor(Box::new(TrailingDotPreprocessor::new(0, true)))
            .unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidArgument(_)));
        let err = dict
            .add_preprocessor(Box::new(DowncasePreprocessor::new(5, true)))
            .unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidArgument(_)));
    }

    #[test]
    fn block_results_split_quotes_and_dedup() {
        let dict = dictionary(&["said", "now"]);
        let block = dict
            .block_results(r#"He said "hello world" now said"#)
            .unwrap();
        assert_eq!(block.final_words(), vec!["He", "said", "hello world", "now"]);
        assert!(!block.is_success());
    }

    #[test]
    fn repeated_miss_in_block_is_charged_once() {
        let dict = dictionary(&["apple"]);
        let block = dict.block_results("zz zz zz").unwrap();
        assert_eq!(block.len(), 1);
        assert!(!block.word_results()[0].word_cached);
        assert_eq!(dict.invalid_words_stats().map(|s| s.used_bytes), Some(2));
    }

    #[test]
    fn unloaded_record_fails_validation() {
        let dict = dictionary(&["apple"]);
        dict.with_record_mut(|r| r.unload());
        assert!(!dict.is_loaded());
        let err = dict.word_results("apple").unwrap_err();
        assert!(matches!(err, DictionaryError::NotLoaded(ref k) if k == "en-US"));
    }

    #[test]
    fn disabled_cache_never_caches() {
        let config = DictionaryConfig {
            max_invalid_words_bytesize: 0,
            ..Default::default()
        };
        let dict = Dictionary::from_words(key(), ["apple"], &config);
        for _ in 0..3 {
            assert!(!dict.word_results("appel").unwrap().word_cached);
        }
        assert!(dict.with_record_mut(|r| !r.word_map().contains_key("appel")));
    }

    #[test]
    fn refresh_after_out_of_band_edit() {
        let dict = dictionary(&["apple"]);
        dict.word_results("zzz").unwrap();
        dict.with_record_mut(|r| {
            r.word_map_mut().remove("zzz");
        });
        assert_eq!(dict.invalid_words_stats().map(|s| s.used_bytes), Some(3));
        dict.refresh();
        assert_eq!(dict.invalid_words_stats().map(|s| s.used_bytes), Some(0));
    }

    #[test]
    fn from_words_counts_distinct_words() {
        let dict = dictionary(&["a", "b", "a"]);
        assert_eq!(dict.word_count(), 2);
        assert_eq!(dict.record_id().get(), 0);
    }
}
