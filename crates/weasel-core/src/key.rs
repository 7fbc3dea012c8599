// Dictionary keys: language, optional region, optional tag

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between key segments in the canonical string form.
pub const KEY_SEPARATOR: char = '-';

/// Error type for dictionary key construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("language must not be empty")]
    EmptyLanguage,
    #[error("invalid language {0:?}: expected ASCII letters only")]
    InvalidLanguage(String),
    #[error("invalid region {0:?}: expected ASCII letters only")]
    InvalidRegion(String),
    #[error("tag must not be empty when present")]
    EmptyTag,
}

/// Identifies one logical dictionary.
///
/// The language is stored lower-cased and the region upper-cased; the tag is
/// kept exactly as given. Two keys are equal when their canonical strings are
/// equal, so `DictionaryKey::new("EN", Some("us"), None)` and
/// `"en-US".parse()` name the same dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DictionaryKey {
    language: String,
    region: Option<String>,
    tag: Option<String>,
}

impl DictionaryKey {
    /// Build a key, normalizing case and validating each segment.
    pub fn new(language: &str, region: Option<&str>, tag: Option<&str>) -> Result<Self, KeyError> {
        if language.is_empty() {
            return Err(KeyError::EmptyLanguage);
        }
        if !is_ascii_alpha(language) {
            return Err(KeyError::InvalidLanguage(language.to_string()));
        }
        let region = match region {
            Some(r) if !is_ascii_alpha(r) => return Err(KeyError::InvalidRegion(r.to_string())),
            Some(r) => Some(r.to_ascii_uppercase()),
            None => None,
        };
        let tag = match tag {
            Some("") => return Err(KeyError::EmptyTag),
            Some(t) => Some(t.to_string()),
            None => None,
        };
        Ok(Self {
            language: language.to_ascii_lowercase(),
            region,
            tag,
        })
    }

    /// Shorthand for a key with only a language.
    pub fn language_only(language: &str) -> Result<Self, KeyError> {
        Self::new(language, None, None)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The locale part of the key (`en` or `en-US`), without the tag.
    pub fn locale(&self) -> String {
        match &self.region {
            Some(region) => format!("{}{KEY_SEPARATOR}{region}", self.language),
            None => self.language.clone(),
        }
    }
}

fn is_ascii_alpha(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Format the canonical key string.
///
/// An empty region between a language and a tag is kept as an empty
/// segment: `format_key("en", None, Some("slang")) == "en--slang"`.
pub fn format_key(language: &str, region: Option<&str>, tag: Option<&str>) -> String {
    let mut key = language.to_string();
    match (region, tag) {
        (Some(region), Some(tag)) => {
            key.push(KEY_SEPARATOR);
            key.push_str(region);
            key.push(KEY_SEPARATOR);
            key.push_str(tag);
        }
        (Some(region), None) => {
            key.push(KEY_SEPARATOR);
            key.push_str(region);
        }
        (None, Some(tag)) => {
            key.push(KEY_SEPARATOR);
            key.push(KEY_SEPARATOR);
            key.push_str(tag);
        }
        (None, None) => {}
    }
    key
}

impl fmt::Display for DictionaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_key(
            &self.language,
            self.region.as_deref(),
            self.tag.as_deref(),
        ))
    }
}

impl FromStr for DictionaryKey {
    type Err = KeyError;

    /// Parse a canonical key string. The tag is everything after the second
    /// separator, so tags may themselves contain `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, KEY_SEPARATOR);
        let language = parts.next().unwrap_or_default();
        let region = parts.next().filter(|r| !r.is_empty());
        let tag = parts.next();
        Self::new(language, region, tag)
    }
}

impl TryFrom<String> for DictionaryKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DictionaryKey> for String {
    fn from(key: DictionaryKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_is_lowercased_and_region_uppercased() {
        let key = DictionaryKey::new("EN", Some("us"), None).unwrap();
        assert_eq!(key.language(), "en");
        assert_eq!(key.region(), Some("US"));
        assert_eq!(key.to_string(), "en-US");
    }

    #[test]
    fn tag_keeps_its_case() {
        let key = DictionaryKey::new("en", Some("GB"), Some("Slang")).unwrap();
        assert_eq!(key.to_string(), "en-GB-Slang");
        assert_eq!(key.locale(), "en-GB");
    }

    #[test]
    fn missing_region_with_tag_keeps_empty_segment() {
        let key = DictionaryKey::new("en", None, Some("tech")).unwrap();
        assert_eq!(key.to_string(), "en--tech");
    }

    #[test]
    fn language_only_key() {
        let key = DictionaryKey::language_only("fi").unwrap();
        assert_eq!(key.to_string(), "fi");
        assert_eq!(key.region(), None);
        assert_eq!(key.tag(), None);
    }

    #[test]
    fn parse_is_inverse_of_display() {
        for s in ["en", "en-US", "en-US-tag", "en--tag", "es-MX-a-b-c"] {
            let key: DictionaryKey = s.parse().unwrap();
            assert_eq!(key.to_string(), s);
        }
    }

    #[test]
    fn parse_normalizes_case() {
        let key: DictionaryKey = "EN-us".parse().unwrap();
        assert_eq!(key, DictionaryKey::new("en", Some("US"), None).unwrap());
    }

    #[test]
    fn parsed_tag_may_contain_separator() {
        let key: DictionaryKey = "en-US-big-list".parse().unwrap();
        assert_eq!(key.tag(), Some("big-list"));
    }

    #[test]
    fn empty_language_is_rejected() {
        assert_eq!(DictionaryKey::new("", None, None), Err(KeyError::EmptyLanguage));
        assert_eq!("".parse::<DictionaryKey>(), Err(KeyError::EmptyLanguage));
    }

    #[test]
    fn non_alphabetic_segments_are_rejected() {
        assert!(matches!(
            DictionaryKey::new("e1", None, None),
            Err(KeyError::InvalidLanguage(_))
        ));
        assert!(matches!(
            DictionaryKey::new("en", Some("U S"), None),
            Err(KeyError::InvalidRegion(_))
        ));
        assert!(matches!(
            DictionaryKey::new("en", Some(""), None),
            Err(KeyError::InvalidRegion(_))
        ));
    }

    #[test]
    fn empty_tag_is_rejected() {
        assert_eq!(
            DictionaryKey::new("en", None, Some("")),
            Err(KeyError::EmptyTag)
        );
        assert_eq!("en-US-".parse::<DictionaryKey>(), Err(KeyError::EmptyTag));
    }

    #[test]
    fn format_key_matches_display() {
        assert_eq!(format_key("en", Some("US"), Some("x")), "en-US-x");
        assert_eq!(format_key("en", None, None), "en");
    }

    #[test]
    fn serializes_as_canonical_string() {
        let key = DictionaryKey::new("en", Some("US"), None).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"en-US\"");
        let back: DictionaryKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
