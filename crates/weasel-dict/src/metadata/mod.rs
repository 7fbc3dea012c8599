// Per-record dictionary metadata
//
// Each dictionary record owns exactly one `DictionaryMetadata`. Keys that
// alias the same record therefore observe the same metadata without any
// shared observer lists: the dictionary calls into the metadata directly,
// under the record's write lock, after any lookup an observer asked to see.

pub mod invalid_words;

use std::any::Any;

pub use invalid_words::{InvalidWordsMetadata, InvalidWordsStats};

use crate::record::WordMap;

/// A named piece of metadata kept alongside a word map.
pub trait MetadataObserver: Send + Sync + 'static {
    /// Stable name; attaching another observer with the same name replaces
    /// this one.
    fn name(&self) -> &str;

    /// Inactive observers stay attached but receive no word-search events.
    fn is_active(&self) -> bool;

    fn is_initialized(&self) -> bool;

    /// Build state from `word_map` unless already initialized.
    fn init(&mut self, word_map: &WordMap) {
        if !self.is_initialized() {
            self.refresh(word_map);
        }
    }

    /// Rebuild state from `word_map` from scratch.
    fn refresh(&mut self, word_map: &WordMap);

    /// Whether a lookup with this outcome needs to reach
    /// [`on_word_search`](Self::on_word_search). Returning `false` lets the
    /// dictionary answer from its read lock alone.
    fn wants_word_search(&self, _found: bool) -> bool {
        true
    }

    /// Called once per lookup. `found` is whether the word was present in
    /// the word map, `valid` its value when present.
    fn on_word_search(&mut self, word: &str, found: bool, valid: bool, word_map: &mut WordMap);

    fn as_any(&self) -> &dyn Any;
}

/// The ordered set of metadata observers owned by one dictionary record.
pub struct DictionaryMetadata {
    observers: Vec<Box<dyn MetadataObserver>>,
}

impl DictionaryMetadata {
    /// Metadata with no observers attached.
    pub fn empty() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Metadata with the built-in invalid-word cache attached.
    pub fn with_invalid_words_budget(budget_bytes: u64) -> Self {
        let mut metadata = Self::empty();
        metadata.attach(Box::new(InvalidWordsMetadata::new(budget_bytes)));
        metadata
    }

    /// Attach an observer. An observer already attached under the same
    /// name is replaced in place, keeping its position in the order.
    pub fn attach(&mut self, observer: Box<dyn MetadataObserver>) {
        match self
            .observers
            .iter()
            .position(|o| o.name() == observer.name())
        {
            Some(index) => self.observers[index] = observer,
            None => self.observers.push(observer),
        }
    }

    pub fn detach(&mut self, name: &str) -> Option<Box<dyn MetadataObserver>> {
        let index = self.observers.iter().position(|o| o.name() == name)?;
        Some(self.observers.remove(index))
    }

    /// Observer names in attachment order.
    pub fn names(&self) -> Vec<&str> {
        self.observers.iter().map(|o| o.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn MetadataObserver> {
        self.observers
            .iter()
            .find(|o| o.name() == name)
            .map(|o| o.as_ref())
    }

    /// The first attached observer of concrete type `T`.
    pub fn observer<T: MetadataObserver>(&self) -> Option<&T> {
        self.observers
            .iter()
            .find_map(|o| o.as_any().downcast_ref::<T>())
    }

    pub fn invalid_words(&self) -> Option<&InvalidWordsMetadata> {
        self.observer::<InvalidWordsMetadata>()
    }

    /// Whether a miss could be cached right now. `false` when no
    /// invalid-word cache is attached.
    pub fn cache_invalid_words(&self) -> bool {
        self.invalid_words()
            .is_some_and(InvalidWordsMetadata::cache_invalid_words)
    }

    /// Whether any active observer wants a word-search event for a lookup
    /// with this outcome.
    pub fn wants_word_search(&self, found: bool) -> bool {
        self.observers
            .iter()
            .any(|o| o.is_active() && o.wants_word_search(found))
    }

    /// Initialize observers that have not been initialized yet. Existing
    /// state is kept, so calling this repeatedly is harmless.
    pub fn init(&mut self, word_map: &WordMap) {
        for observer in &mut self.observers {
            observer.init(word_map);
        }
    }

    /// Rebuild every observer from the current word map.
    pub fn refresh(&mut self, word_map: &WordMap) {
        for observer in &mut self.observers {
            observer.refresh(word_map);
        }
    }

    /// Deliver a word-search event to active observers in attachment order.
    pub fn notify_word_search(
        &mut self,
        word: &str,
        found: bool,
        valid: bool,
        word_map: &mut WordMap,
    ) {
        for observer in self.observers.iter_mut().filter(|o| o.is_active()) {
            observer.on_word_search(word, found, valid, word_map);
        }
    }
}

impl Default for DictionaryMetadata {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for DictionaryMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryMetadata")
            .field("observers", &self.names())
            .finish()
    }
}
