// Dictionary records: one physical word set shared by every key that aliases it

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::loader::DictionarySource;
use crate::metadata::DictionaryMetadata;

/// Word -> validity. `true` entries come from the dictionary source; `false`
/// entries are misses remembered by the invalid-word cache. Absence means
/// the word has never been resolved.
pub type WordMap = hashbrown::HashMap<String, bool>;

/// Registry-internal identifier of a dictionary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) u32);

impl RecordId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to a record. Readers take the read lock for lookups; cache
/// writes, loads, unloads and refreshes take the write lock.
pub type SharedRecord = Arc<RwLock<DictionaryRecord>>;

/// Outcome of looking a word up in the word map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub found: bool,
    pub valid: bool,
}

/// A word set plus its metadata and load state.
#[derive(Debug)]
pub struct DictionaryRecord {
    id: RecordId,
    source: DictionarySource,
    word_map: WordMap,
    metadata: DictionaryMetadata,
    loaded: bool,
}

impl DictionaryRecord {
    /// An unloaded record with an empty word map.
    pub fn new(id: RecordId, source: DictionarySource, metadata: DictionaryMetadata) -> Self {
        Self {
            id,
            source,
            word_map: WordMap::new(),
            metadata,
            loaded: false,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn source(&self) -> &DictionarySource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn word_map(&self) -> &WordMap {
        &self.word_map
    }

    /// Direct access to the word map for out-of-band edits. Call
    /// [`refresh`](Self::refresh) afterwards so metadata catches up.
    pub fn word_map_mut(&mut self) -> &mut WordMap {
        &mut self.word_map
    }

    pub fn metadata(&self) -> &DictionaryMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DictionaryMetadata {
        &mut self.metadata
    }

    /// Number of words from the dictionary source (cached misses excluded).
    pub fn word_count(&self) -> usize {
        self.word_map.values().filter(|&&valid| valid).count()
    }

    /// Replace the word map with `words`, all valid, then initialize
    /// metadata and mark the record loaded.
    pub fn load_words(&mut self, words: Vec<String>) {
        self.word_map = words.into_iter().map(|w| (w, true)).collect();
        self.metadata.init(&self.word_map);
        self.loaded = true;
    }

    /// Drop the word map, keeping source and metadata.
    pub fn unload(&mut self) {
        self.word_map = WordMap::new();
        self.loaded = false;
    }

    pub fn lookup(&self, word: &str) -> Lookup {
        match self.word_map.get(word) {
            Some(&valid) => Lookup { found: true, valid },
            None => Lookup {
                found: false,
                valid: false,
            },
        }
    }

    /// Tell the metadata about a lookup, letting it cache a miss.
    pub fn notify_word_search(&mut self, word: &str, lookup: Lookup) {
        self.metadata
            .notify_word_search(word, lookup.found, lookup.valid, &mut self.word_map);
    }

    /// Rebuild metadata from the current word map.
    pub fn refresh(&mut self) {
        self.metadata.refresh(&self.word_map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(budget: u64) -> DictionaryRecord {
        DictionaryRecord::new(
            RecordId(0),
            DictionarySource::memory("test"),
            DictionaryMetadata::with_invalid_words_budget(budget),
        )
    }

    #[test]
    fn new_record_is_unloaded() {
        let r = record(10);
        assert!(!r.is_loaded());
        assert!(r.word_map().is_empty());
        assert_eq!(r.id().to_string(), "#0");
    }

    #[test]
    fn load_marks_words_valid() {
        let mut r = record(10);
        r.load_words(vec!["apple".into(), "pear".into()]);
        assert!(r.is_loaded());
        assert_eq!(r.word_count(), 2);
        assert_eq!(r.lookup("apple"), Lookup { found: true, valid: true });
        assert_eq!(r.lookup("plum"), Lookup { found: false, valid: false });
    }

    #[test]
    fn miss_notification_caches_word() {
        let mut r = record(10);
        r.load_words(vec!["apple".into()]);
        let lookup = r.lookup("appel");
        r.notify_word_search("appel", lookup);
        assert_eq!(r.lookup("appel"), Lookup { found: true, valid: false });
        assert_eq!(r.word_count(), 1);
    }

    #[test]
    fn unload_keeps_metadata() {
        let mut r = record(10);
        r.load_words(vec!["apple".into()]);
        let lookup = r.lookup("appel");
        r.notify_word_search("appel", lookup);
        r.unload();
        assert!(!r.is_loaded());
        assert!(r.word_map().is_empty());
        assert_eq!(r.metadata().invalid_words().map(|m| m.used_bytes()), Some(5));

        // Reloading keeps accounting until an explicit refresh.
        r.load_words(vec!["apple".into()]);
        assert_eq!(r.metadata().invalid_words().map(|m| m.used_bytes()), Some(5));
        r.refresh();
        assert_eq!(r.metadata().invalid_words().map(|m| m.used_bytes()), Some(0));
    }

    #[test]
    fn out_of_band_edit_then_refresh() {
        let mut r = record(100);
        r.load_words(vec!["apple".into()]);
        r.word_map_mut().insert("zzz".into(), false);
        r.refresh();
        assert_eq!(r.metadata().invalid_words().map(|m| m.used_bytes()), Some(3));
    }
}
