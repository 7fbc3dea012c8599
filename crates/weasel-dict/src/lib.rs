//! Dictionary registry and word validation.
//!
//! A [`DictionaryCacheRegistry`] maps dictionary keys to shared word sets.
//! Keys whose sources are equal alias one record, so each dictionary file is
//! loaded once no matter how many keys reference it. A [`Dictionary`] handle
//! validates words against its record through a pipeline of preprocessors,
//! filters and a word-map lookup, and remembers misses in a byte-bounded
//! invalid-word cache.
//!
//! # Architecture
//!
//! - [`registry`] -- key -> record mapping, aliasing, load/unload/reset
//! - [`record`] -- one word map plus its metadata and load state
//! - [`metadata`] -- per-record observers, including the invalid-word cache
//! - [`dictionary`] -- the validation pipeline for words and text blocks
//! - [`filter`] -- word filters (numbers, currency, single letters, URLs)
//! - [`preprocessor`] -- ordered word transforms
//! - [`tokenizer`] -- quote-aware block splitting
//! - [`loader`] -- dictionary sources and the file word loader
//! - [`config`] -- limits and default pipeline, loadable from JSON
//! - [`error`] -- error types

pub mod config;
pub mod dictionary;
pub mod error;
pub mod filter;
pub mod loader;
pub mod metadata;
pub mod preprocessor;
pub mod record;
pub mod registry;
pub mod tokenizer;

pub use config::{
    DEFAULT_MAX_DICTIONARY_FILE_BYTES, DEFAULT_MAX_INVALID_WORDS_BYTESIZE, DictionaryConfig,
    FilterDescriptor, PreprocessorDescriptor,
};
pub use dictionary::Dictionary;
pub use error::{DictionaryError, LoadError, Result};
pub use filter::{FilterKind, WordFilter};
pub use loader::{DictionarySource, FileWordLoader, WordLoader};
pub use metadata::{DictionaryMetadata, InvalidWordsMetadata, InvalidWordsStats, MetadataObserver};
pub use preprocessor::{PreprocessorKind, WordPreprocessor};
pub use record::{DictionaryRecord, RecordId};
pub use registry::DictionaryCacheRegistry;
pub use weasel_core::{BlockResults, DictionaryKey, PreprocessedWord, WordResults};
