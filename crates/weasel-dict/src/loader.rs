// Dictionary sources and the word loader

use std::fmt;
use std::path::{Path, PathBuf};

use hashbrown::HashSet;

use crate::error::LoadError;

/// Where a dictionary's words come from.
///
/// Records are deduplicated by source equality: two keys referencing the
/// same path (or the same memory label) share one word set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DictionarySource {
    /// A word list file on disk.
    File(PathBuf),
    /// Words supplied by the caller, identified by a label.
    Memory(String),
}

impl DictionarySource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        DictionarySource::File(path.into())
    }

    pub fn memory(label: impl Into<String>) -> Self {
        DictionarySource::Memory(label.into())
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, DictionarySource::Memory(_))
    }
}

impl fmt::Display for DictionarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionarySource::File(path) => write!(f, "{}", path.display()),
            DictionarySource::Memory(label) => write!(f, "*{label}"),
        }
    }
}

/// Produces the word list of a dictionary source.
///
/// Words should be distinct; the registry keeps only the first of any
/// duplicates when building the word map.
pub trait WordLoader: Send + Sync {
    fn load_words(&self, source: &DictionarySource) -> Result<Vec<String>, LoadError>;
}

/// Remove duplicate words, keeping the first occurrence of each.
pub fn dedup_words<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for word in words {
        let word = word.into();
        if seen.insert(word.clone()) {
            result.push(word);
        }
    }
    result
}

/// Loads whitespace-separated word lists from UTF-8 files.
#[derive(Debug, Clone)]
pub struct FileWordLoader {
    max_bytes: u64,
}

impl FileWordLoader {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn load_file(&self, path: &Path) -> Result<Vec<String>, LoadError> {
        let io_error = |source: std::io::Error| match source.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        };

        let metadata = std::fs::metadata(path).map_err(io_error)?;
        if !metadata.is_file() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        let size = metadata.len();
        if size == 0 {
            return Err(LoadError::Empty(path.display().to_string()));
        }
        if size > self.max_bytes {
            return Err(LoadError::TooLarge {
                path: path.to_path_buf(),
                size,
                max: self.max_bytes,
            });
        }

        let bytes = std::fs::read(path).map_err(io_error)?;
        let contents = String::from_utf8(bytes).map_err(|_| LoadError::Format(path.to_path_buf()))?;
        Ok(dedup_words(contents.split_whitespace()))
    }
}

impl WordLoader for FileWordLoader {
    fn load_words(&self, source: &DictionarySource) -> Result<Vec<String>, LoadError> {
        match source {
            DictionarySource::File(path) => self.load_file(path),
            // Memory words only exist in the caller's hands.
            DictionarySource::Memory(_) => Err(LoadError::NotFound(source.to_string())),
        }
    }
}
