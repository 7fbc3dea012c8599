// Dictionary configuration, passed by value into the registry

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DictionaryError, LoadError, Result};
use crate::filter::{FilterKind, WordFilter};
use crate::preprocessor::{PreprocessorKind, WordPreprocessor};

/// Largest dictionary file accepted by default, in bytes.
pub const DEFAULT_MAX_DICTIONARY_FILE_BYTES: u64 = 4_000_000;

/// Default budget for the invalid-word cache, in bytes.
pub const DEFAULT_MAX_INVALID_WORDS_BYTESIZE: u64 = 25_000;

/// Configuration entry naming a built-in filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub kind: FilterKind,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl FilterDescriptor {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            enabled: true,
        }
    }

    pub fn build(&self) -> Box<dyn WordFilter> {
        self.kind.build(self.enabled)
    }
}

/// Configuration entry naming a built-in preprocessor. The order of the
/// entry in `default_word_preprocessors` becomes the preprocessor's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessorDescriptor {
    pub kind: PreprocessorKind,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl PreprocessorDescriptor {
    pub fn new(kind: PreprocessorKind) -> Self {
        Self {
            kind,
            enabled: true,
        }
    }

    pub fn build(&self, order: u32) -> Box<dyn WordPreprocessor> {
        self.kind.build(order, self.enabled)
    }
}

fn enabled_by_default() -> bool {
    true
}

/// Options shared by every dictionary created from one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Dictionary files larger than this are rejected with `TooLarge`.
    pub max_dictionary_file_bytes: u64,
    /// Byte budget of the invalid-word cache. `0` disables the cache.
    pub max_invalid_words_bytesize: u64,
    /// Filters attached to every new dictionary handle, in evaluation order.
    pub default_word_filters: Vec<FilterDescriptor>,
    /// Preprocessors attached to every new dictionary handle, in chain order.
    pub default_word_preprocessors: Vec<PreprocessorDescriptor>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            max_dictionary_file_bytes: DEFAULT_MAX_DICTIONARY_FILE_BYTES,
            max_invalid_words_bytesize: DEFAULT_MAX_INVALID_WORDS_BYTESIZE,
            default_word_filters: vec![
                FilterDescriptor::new(FilterKind::Numeric),
                FilterDescriptor::new(FilterKind::SingleCharacter),
            ],
            default_word_preprocessors: Vec::new(),
        }
    }
}

impl DictionaryConfig {
    /// Parse a JSON configuration. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                DictionaryError::Load(LoadError::NotFound(path.display().to_string()))
            }
            _ => DictionaryError::Load(LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        })?;
        Self::from_json_str(&contents)
    }

    /// Whether misses may be cached at all.
    pub fn invalid_words_cache_enabled(&self) -> bool {
        self.max_invalid_words_bytesize > 0
    }

    pub fn build_filters(&self) -> Vec<Box<dyn WordFilter>> {
        self.default_word_filters
            .iter()
            .map(FilterDescriptor::build)
            .collect()
    }

    pub fn build_preprocessors(&self) -> Vec<Box<dyn WordPreprocessor>> {
        self.default_word_preprocessors
            .iter()
            .zip(0u32..)
            .map(|(descriptor, order)| descriptor.build(order))
            .collect()
    }
}
