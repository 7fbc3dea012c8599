// Error types for loading and dictionary management

use std::path::PathBuf;

use weasel_core::KeyError;

/// Failure to produce a word list from a dictionary source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dictionary source not found: {0}")]
    NotFound(String),

    #[error("dictionary source is empty: {0}")]
    Empty(String),

    #[error("dictionary file {path} is {size} bytes, larger than the {max} byte limit")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("dictionary file {0} is not valid UTF-8")]
    Format(PathBuf),

    #[error("failed to read dictionary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the registry and the validation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// Malformed input: bad key, bad filter or preprocessor registration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    InvalidKey(#[from] KeyError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("dictionary reference already exists for key {0}")]
    DuplicateReference(String),

    #[error("no dictionary reference for key {0}")]
    UnknownKey(String),

    #[error("dictionary for key {0} is not loaded")]
    NotLoaded(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = DictionaryError> = std::result::Result<T, E>;
