//! Shared types for weasel dictionaries.
//!
//! - [`key`] -- dictionary keys (`language-REGION-tag`) and their canonical
//!   string form
//! - [`results`] -- immutable per-word and per-block validation outcomes

pub mod key;
pub mod results;

pub use key::{DictionaryKey, KeyError, format_key};
pub use results::{BlockResults, PreprocessedWord, WordResults};
