// DictionaryCacheRegistry: maps dictionary keys to shared dictionary records
//
// Lock discipline: the key map (`RegistryState`) has one lock, and every
// record has its own. The state lock may be held while a record lock is
// taken, never the other way round. Word loading runs with no lock held.

use std::path::PathBuf;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use weasel_core::DictionaryKey;

use crate::config::DictionaryConfig;
use crate::dictionary::Dictionary;
use crate::error::{DictionaryError, LoadError, Result};
use crate::loader::{DictionarySource, FileWordLoader, WordLoader, dedup_words};
use crate::metadata::DictionaryMetadata;
use crate::record::{DictionaryRecord, RecordId, SharedRecord};

/// Key map plus record table.
#[derive(Default)]
struct RegistryState {
    /// Canonical key string -> record.
    references: HashMap<String, RecordId>,
    records: HashMap<RecordId, SharedRecord>,
    /// Source -> record, for aliasing keys that share a source.
    sources: HashMap<DictionarySource, RecordId>,
    next_id: u32,
}

impl RegistryState {
    fn record_for(&self, key: &DictionaryKey) -> Result<SharedRecord> {
        let id = self
            .references
            .get(&key.to_string())
            .ok_or_else(|| DictionaryError::UnknownKey(key.to_string()))?;
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| DictionaryError::UnknownKey(key.to_string()))
    }

    /// Remove a record that no key refers to any more. Outstanding
    /// dictionary handles see it as unloaded.
    fn drop_record(&mut self, id: RecordId) {
        if let Some(record) = self.records.remove(&id) {
            let mut record = record.write();
            self.sources.remove(record.source());
            record.unload();
        }
    }
}

/// The shared store of dictionaries.
///
/// Several keys may reference one record: [`add_reference`] aliases a key to
/// the existing record whenever its source equals one already referenced.
/// Records are only removed by [`reset`], [`reset_all`] or [`kill`].
///
/// The registry is `Send + Sync`; share it through an `Arc` to serve many
/// call sites.
///
/// [`add_reference`]: Self::add_reference
/// [`reset`]: Self::reset
/// [`reset_all`]: Self::reset_all
/// [`kill`]: Self::kill
pub struct DictionaryCacheRegistry {
    config: DictionaryConfig,
    loader: Box<dyn WordLoader>,
    state: RwLock<RegistryState>,
}

impl DictionaryCacheRegistry {
    /// A registry that loads files with [`FileWordLoader`].
    pub fn new(config: DictionaryConfig) -> Self {
        let loader = FileWordLoader::new(config.max_dictionary_file_bytes);
        Self::with_loader(config, loader)
    }

    pub fn with_loader(config: DictionaryConfig, loader: impl WordLoader + 'static) -> Self {
        Self {
            config,
            loader: Box::new(loader),
            state: RwLock::new(RegistryState::default()),
        }
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    // =========================================================================
    // References
    // =========================================================================

    /// Register `key` as referring to `source`.
    ///
    /// If another key already references an equal source, `key` becomes an
    /// alias of that record; its words and metadata are left untouched.
    pub fn add_reference(&self, key: &DictionaryKey, source: DictionarySource) -> Result<RecordId> {
        let key_string = key.to_string();
        let mut state = self.state.write();
        if state.references.contains_key(&key_string) {
            return Err(DictionaryError::DuplicateReference(key_string));
        }

        let id = match state.sources.get(&source) {
            Some(&id) => {
                tracing::debug!(key = %key_string, record = %id, %source, "aliased dictionary reference");
                id
            }
            None => {
                let id = RecordId(state.next_id);
                state.next_id += 1;
                let metadata =
                    DictionaryMetadata::with_invalid_words_budget(self.config.max_invalid_words_bytesize);
                let record = DictionaryRecord::new(id, source.clone(), metadata);
                state.records.insert(id, Arc::new(RwLock::new(record)));
                tracing::debug!(key = %key_string, record = %id, %source, "added dictionary reference");
                state.sources.insert(source, id);
                id
            }
        };
        state.references.insert(key_string, id);
        Ok(id)
    }

    pub fn is_reference(&self, key: &DictionaryKey) -> bool {
        self.state.read().references.contains_key(&key.to_string())
    }

    pub fn record_id(&self, key: &DictionaryKey) -> Option<RecordId> {
        self.state.read().references.get(&key.to_string()).copied()
    }

    pub fn source(&self, key: &DictionaryKey) -> Option<DictionarySource> {
        let record = self.state.read().record_for(key).ok()?;
        let source = record.read().source().clone();
        Some(source)
    }

    /// Referenced key strings, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.read().references.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn reference_count(&self) -> usize {
        self.state.read().references.len()
    }

    pub fn record_count(&self) -> usize {
        self.state.read().records.len()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    pub fn is_loaded(&self, key: &DictionaryKey) -> bool {
        let record = match self.state.read().record_for(key) {
            Ok(record) => record,
            Err(_) => return false,
        };
        record.read().is_loaded()
    }

    /// Load the record referenced by `key`, reading its source through the
    /// word loader. An already loaded record is returned as-is without
    /// touching the loader.
    pub fn load(&self, key: &DictionaryKey) -> Result<Dictionary> {
        let record = self.state.read().record_for(key)?;

        let source = {
            let guard = record.read();
            if guard.is_loaded() {
                return Ok(self.dictionary_for(key, record.clone()));
            }
            guard.source().clone()
        };

        let words = self.loader.load_words(&source)?;
        self.install_words(key, &record, words);
        Ok(self.dictionary_for(key, record))
    }

    /// Load the record referenced by `key` from caller-supplied words.
    /// Duplicates are dropped; an empty list fails with
    /// [`LoadError::Empty`]. An already loaded record is returned as-is.
    pub fn load_from_words<I, S>(&self, key: &DictionaryKey, words: I) -> Result<Dictionary>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let record = self.state.read().record_for(key)?;
        if record.read().is_loaded() {
            return Ok(self.dictionary_for(key, record));
        }

        let words = dedup_words(words);
        if words.is_empty() {
            return Err(LoadError::Empty(key.to_string()).into());
        }
        self.install_words(key, &record, words);
        Ok(self.dictionary_for(key, record))
    }

    /// Reference and load a dictionary file in one step.
    pub fn create_dictionary(&self, key: &DictionaryKey, path: impl Into<PathBuf>) -> Result<Dictionary> {
        self.add_reference(key, DictionarySource::File(path.into()))?;
        self.load(key)
    }

    /// Reference and load an in-memory dictionary in one step. Keys created
    /// with the same `label` share one record.
    pub fn create_dictionary_from_memory<I, S>(
        &self,
        key: &DictionaryKey,
        label: &str,
        words: I,
    ) -> Result<Dictionary>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_reference(key, DictionarySource::memory(label))?;
        self.load_from_words(key, words)
    }

    /// A handle to an already loaded dictionary.
    pub fn dictionary(&self, key: &DictionaryKey) -> Result<Dictionary> {
        let record = self.state.read().record_for(key)?;
        if !record.read().is_loaded() {
            return Err(DictionaryError::NotLoaded(key.to_string()));
        }
        Ok(self.dictionary_for(key, record))
    }

    /// Drop the word map of the record referenced by `key`. The reference,
    /// its aliases and the record's metadata are kept.
    pub fn unload(&self, key: &DictionaryKey) -> Result<()> {
        let record = self.state.read().record_for(key)?;
        let mut record = record.write();
        if !record.is_loaded() {
            return Err(DictionaryError::NotLoaded(key.to_string()));
        }
        record.unload();
        tracing::info!(key = %key, record = %record.id(), "unloaded dictionary");
        Ok(())
    }

    /// Rebuild the metadata of the record referenced by `key` from its
    /// current word map.
    pub fn refresh(&self, key: &DictionaryKey) -> Result<()> {
        let record = self.state.read().record_for(key)?;
        let mut record = record.write();
        record.refresh();
        tracing::debug!(key = %key, record = %record.id(), "refreshed dictionary metadata");
        Ok(())
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Drop the reference for `key`, and its record when no other key
    /// refers to it.
    pub fn reset(&self, key: &DictionaryKey) -> Result<()> {
        let key_string = key.to_string();
        let mut state = self.state.write();
        let id = state
            .references
            .remove(&key_string)
            .ok_or_else(|| DictionaryError::UnknownKey(key_string.clone()))?;
        if !state.references.values().any(|&other| other == id) {
            state.drop_record(id);
        }
        tracing::debug!(key = %key_string, record = %id, "reset dictionary reference");
        Ok(())
    }

    /// Drop every reference and record, and restart record ids.
    pub fn reset_all(&self) {
        let mut state = self.state.write();
        let ids: Vec<RecordId> = state.records.keys().copied().collect();
        for id in ids {
            state.drop_record(id);
        }
        *state = RegistryState::default();
        tracing::debug!("reset all dictionary references");
    }

    /// Remove the record referenced by `key` together with every key that
    /// aliases it. Returns the removed keys, sorted.
    pub fn kill(&self, key: &DictionaryKey) -> Result<Vec<String>> {
        let key_string = key.to_string();
        let mut state = self.state.write();
        let id = *state
            .references
            .get(&key_string)
            .ok_or_else(|| DictionaryError::UnknownKey(key_string.clone()))?;

        let mut removed: Vec<String> = state
            .references
            .iter()
            .filter(|&(_, &other)| other == id)
            .map(|(k, _)| k.clone())
            .collect();
        removed.sort();
        for k in &removed {
            state.references.remove(k);
        }
        state.drop_record(id);
        tracing::info!(key = %key_string, record = %id, keys = removed.len(), "killed dictionary");
        Ok(removed)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn dictionary_for(&self, key: &DictionaryKey, record: SharedRecord) -> Dictionary {
        Dictionary::new(key.clone(), record, &self.config)
    }

    /// Install loaded words unless another caller loaded the record first.
    fn install_words(&self, key: &DictionaryKey, record: &SharedRecord, words: Vec<String>) {
        let mut record = record.write();
        if record.is_loaded() {
            return;
        }
        let word_count = words.len();
        record.load_words(words);
        tracing::info!(
            key = %key,
            record = %record.id(),
            source = %record.source(),
            words = word_count,
            "loaded dictionary"
        );
    }
}

impl Default for DictionaryCacheRegistry {
    fn default() -> Self {
        Self::new(DictionaryConfig::default())
    }
}

impl std::fmt::Debug for DictionaryCacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("DictionaryCacheRegistry")
            .field("references", &state.references.len())
            .field("records", &state.records.len())
            .field("config", &self.config)
            .finish()
    }
}
