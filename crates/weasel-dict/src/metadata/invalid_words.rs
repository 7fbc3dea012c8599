// Byte-budgeted cache of words that were looked up and not found

use std::any::Any;

use serde::Serialize;

use crate::metadata::MetadataObserver;
use crate::record::WordMap;

/// Point-in-time view of an invalid-word cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvalidWordsStats {
    pub enabled: bool,
    pub budget_bytes: u64,
    pub used_bytes: u64,
    pub cached_words: usize,
}

/// Remembers dictionary misses as `word -> false` entries in the word map,
/// so repeated misses are answered by a single lookup.
///
/// The cache never grows past its byte budget. A miss whose byte length
/// would push `used_bytes` over the budget is not cached and is looked up
/// from scratch every time it is queried again.
///
/// `used_bytes` is maintained incrementally on each cache write and
/// recomputed from the word map by [`refresh`](MetadataObserver::refresh).
#[derive(Debug, Clone)]
pub struct InvalidWordsMetadata {
    budget_bytes: u64,
    used_bytes: u64,
    cached_words: usize,
    initialized: bool,
}

impl InvalidWordsMetadata {
    pub const NAME: &'static str = "invalid_words";

    /// Create a cache with the given budget. A budget of `0` disables it.
    pub fn new(budget_bytes: u64) -> Self {
        Self {
            budget_bytes,
            used_bytes: 0,
            cached_words: 0,
            initialized: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.budget_bytes > 0
    }

    pub fn budget_bytes(&self) -> u64 {
        self.budget_bytes
    }

    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn cached_words(&self) -> usize {
        self.cached_words
    }

    /// Whether attempting to cache another miss is worthwhile. Callers use
    /// this to skip the write path entirely once the cache is disabled or
    /// out-of-band mutation has pushed it over budget.
    pub fn cache_invalid_words(&self) -> bool {
        self.is_enabled() && self.used_bytes <= self.budget_bytes
    }

    pub fn stats(&self) -> InvalidWordsStats {
        InvalidWordsStats {
            enabled: self.is_enabled(),
            budget_bytes: self.budget_bytes,
            used_bytes: self.used_bytes,
            cached_words: self.cached_words,
        }
    }

    /// Decide whether to remember a miss, writing it to `word_map` when it
    /// fits the budget. Returns `true` if the word was cached.
    pub fn cache_miss(&mut self, word: &str, word_map: &mut WordMap) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let cost = word.len() as u64;
        match self.used_bytes.checked_add(cost) {
            Some(total) if total <= self.budget_bytes => {
                word_map.insert(word.to_string(), false);
                self.used_bytes = total;
                self.cached_words += 1;
                tracing::trace!(word, cost, used_bytes = total, "cached invalid word");
                true
            }
            _ => {
                tracing::trace!(
                    word,
                    cost,
                    used_bytes = self.used_bytes,
                    budget_bytes = self.budget_bytes,
                    "invalid word exceeds cache budget"
                );
                false
            }
        }
    }
}

impl MetadataObserver for InvalidWordsMetadata {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_active(&self) -> bool {
        self.is_enabled()
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn refresh(&mut self, word_map: &WordMap) {
        let (used_bytes, cached_words) = if self.is_enabled() {
            word_map
                .iter()
                .filter(|&(_, &valid)| !valid)
                .fold((0u64, 0usize), |(bytes, count), (word, _)| {
                    (bytes + word.len() as u64, count + 1)
                })
        } else {
            (0, 0)
        };
        self.used_bytes = used_bytes;
        self.cached_words = cached_words;
        self.initialized = true;
    }

    fn wants_word_search(&self, found: bool) -> bool {
        !found && self.cache_invalid_words()
    }

    fn on_word_search(&mut self, word: &str, found: bool, _valid: bool, word_map: &mut WordMap) {
        if found {
            return;
        }
        self.cache_miss(word, word_map);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
