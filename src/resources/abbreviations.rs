//! Chat abbreviation table.

use super::{read_resource, resource_error};
use crate::error::Result;
use crate::pipeline::normalize;
use std::collections::HashMap;
use std::path::Path;

/// Built-in abbreviation table.
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("thnx", "thanks"),
    ("thx", "thanks"),
    ("pls", "please"),
    ("plz", "please"),
    ("btw", "by the way"),
    ("omg", "oh my god"),
    ("idk", "I don't know"),
    ("imo", "in my opinion"),
    ("brb", "be right back"),
    ("bff", "best friends forever"),
    ("afaik", "as far as I know"),
    ("lmk", "let me know"),
    ("tbh", "to be honest"),
    ("np", "no problem"),
    ("smh", "shaking my head"),
    ("rn", "right now"),
    ("irl", "in real life"),
    ("ftw", "for the win"),
    ("fyi", "for your information"),
    ("gg", "good game"),
    ("idc", "I don't care"),
    ("nvm", "never mind"),
    ("dm", "direct message"),
    ("msg", "message"),
];

/// Mapping from a lowercase token to its expansion phrase.
///
/// Entries are canonicalized on insertion: keys are lowercased, expansions
/// are passed through the normalizer. A key that could never appear in
/// normalized text (digits, punctuation, inner whitespace) is rejected.
#[derive(Debug, Clone)]
pub struct AbbreviationMap {
    entries: HashMap<String, String>,
}

impl Default for AbbreviationMap {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ABBREVIATIONS.iter().copied())
    }
}

impl AbbreviationMap {
    /// Creates an empty map.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds a map from `(abbreviation, expansion)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::empty();
        for (key, value) in pairs {
            map.insert(key.as_ref(), value.as_ref());
        }
        map
    }

    /// Loads a map from a JSON object of string pairs.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_resource(path)?;
        let pairs: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| resource_error(path, e.to_string()))?;

        let map = Self::from_pairs(pairs);
        tracing::debug!(path = %path.display(), entries = map.len(), "loaded abbreviations");
        Ok(map)
    }

    /// Inserts one entry. Returns false if the key was rejected.
    pub fn insert(&mut self, key: &str, expansion: &str) -> bool {
        let key = key.trim().to_lowercase();
        if key.is_empty() || key.contains(char::is_whitespace) || normalize(&key) != key {
            tracing::warn!(key = %key, "ignoring abbreviation that cannot match normalized text");
            return false;
        }

        let expansion = normalize(expansion)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        self.entries.insert(key, expansion);
        true
    }

    /// Looks up the expansion for a token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table() {
        let map = AbbreviationMap::default();
        assert_eq!(map.len(), DEFAULT_ABBREVIATIONS.len());
        assert_eq!(map.get("omg"), Some("oh my god"));
        assert_eq!(map.get("OMG"), None);
    }

    #[test]
    fn test_expansions_are_normalized() {
        let map = AbbreviationMap::default();
        assert_eq!(map.get("idk"), Some("i don t know"));
        assert_eq!(map.get("afaik"), Some("as far as i know"));
    }

    #[test]
    fn test_mixed_case_keys_are_lowercased() {
        let map = AbbreviationMap::from_pairs([("LOL", "laughing out loud")]);
        assert_eq!(map.get("lol"), Some("laughing out loud"));
    }

    #[test]
    fn test_unmatchable_keys_rejected() {
        let mut map = AbbreviationMap::empty();
        assert!(!map.insert("2day", "today"));
        assert!(!map.insert("b/c", "because"));
        assert!(!map.insert("   ", "nothing"));
        assert!(!map.insert("a b", "nothing"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gr8": "great", "ty": "Thank you!"}}"#).unwrap();

        let map = AbbreviationMap::load(file.path()).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("ty"), Some("thank you"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let result = AbbreviationMap::load(file.path());
        assert!(matches!(result, Err(crate::Error::Resource { .. })));
    }
}
