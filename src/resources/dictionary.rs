//! Word-frequency model used for spelling correction.

use super::{read_resource, resource_error};
use crate::error::Result;
use crate::pipeline::spoken_name;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Bundled English word frequencies.
const ENGLISH_WORDS: &str = include_str!("english_words.txt");

/// The built-in vocabulary: the English word list plus every word of the
/// emoji names, so translated emoji are never rewritten.
static ENGLISH: LazyLock<Arc<HashMap<String, u64>>> = LazyLock::new(|| {
    let entries = parse_word_lines(Path::new("english_words.txt"), ENGLISH_WORDS)
        .expect("bundled word list is well-formed");

    let mut counts = HashMap::with_capacity(entries.len());
    for (word, count) in entries {
        *counts.entry(word).or_insert(0) += count;
    }
    for emoji in emojis::iter() {
        for word in spoken_name(emoji).split_whitespace() {
            counts.entry(word.to_string()).or_insert(1);
        }
    }
    Arc::new(counts)
});

/// Spelling correction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellOptions {
    /// Maximum edit distance searched for candidates (1 or 2).
    pub max_distance: u8,
    /// Dictionary entries with a count at or below this value are ignored.
    pub threshold: u64,
}

impl Default for SpellOptions {
    fn default() -> Self {
        Self {
            max_distance: 2,
            threshold: 0,
        }
    }
}

impl SpellOptions {
    /// Sets the maximum edit distance, clamped to 1-2.
    pub fn with_max_distance(mut self, distance: u8) -> Self {
        self.max_distance = distance.clamp(1, 2);
        self
    }

    /// Sets the minimum-count threshold.
    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Known words and their corpus frequencies.
///
/// The default model is the bundled English vocabulary. An empty model
/// recognizes nothing, which turns spelling correction into the identity.
#[derive(Debug, Clone)]
pub struct SpellModel {
    counts: Arc<HashMap<String, u64>>,
    options: SpellOptions,
}

impl Default for SpellModel {
    fn default() -> Self {
        Self::english()
    }
}

impl SpellModel {
    /// Creates a model with no known words.
    pub fn empty() -> Self {
        Self {
            counts: Arc::default(),
            options: SpellOptions::default(),
        }
    }

    /// The bundled English word-frequency model.
    ///
    /// The vocabulary is parsed once per process and shared by every model
    /// built from it.
    pub fn english() -> Self {
        Self {
            counts: Arc::clone(&*ENGLISH),
            options: SpellOptions::default(),
        }
    }

    /// Builds a model from `(word, count)` pairs. Words are lowercased and
    /// counts of repeated words are summed.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut merged = HashMap::new();
        for (word, count) in counts {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                *merged.entry(word).or_insert(0) += count;
            }
        }
        Self {
            counts: Arc::new(merged),
            options: SpellOptions::default(),
        }
    }

    /// Loads a model from disk.
    ///
    /// `.json` files hold a `{"word": count}` object. Any other file holds
    /// one `word [count]` entry per line; a missing count means 1.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_resource(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let model = if is_json {
            let counts: HashMap<String, u64> = serde_json::from_str(&content)
                .map_err(|e| resource_error(path, e.to_string()))?;
            Self::from_counts(counts)
        } else {
            Self::from_counts(parse_word_lines(path, &content)?)
        };

        tracing::debug!(path = %path.display(), words = model.len(), "loaded spelling dictionary");
        Ok(model)
    }

    /// Applies correction settings.
    pub fn with_options(mut self, options: SpellOptions) -> Self {
        self.options = options;
        self
    }

    /// Correction settings.
    pub fn options(&self) -> SpellOptions {
        self.options
    }

    /// Frequency of a known word, or `None` if unknown or below threshold.
    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.counts
            .get(word)
            .copied()
            .filter(|&count| count > self.options.threshold)
    }

    /// Returns true if `word` is a known word.
    pub fn contains(&self, word: &str) -> bool {
        self.frequency(word).is_some()
    }

    /// Number of entries, ignoring the threshold.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if the model has no entries.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

fn parse_word_lines(path: &Path, content: &str) -> Result<Vec<(String, u64)>> {
    let mut entries = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let word = parts.next().unwrap_or_default();
        let count = match parts.next() {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                resource_error(path, format!("line {}: invalid count '{}'", line_no + 1, raw))
            })?,
            None => 1,
        };
        entries.push((word.to_string(), count));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_counts_merges_case() {
        let model = SpellModel::from_counts([("The", 3), ("the", 2), ("cat", 1)]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.frequency("the"), Some(5));
    }

    #[test]
    fn test_threshold_hides_rare_words() {
        let model = SpellModel::from_counts([("common", 50), ("rare", 2)])
            .with_options(SpellOptions::default().with_threshold(2));
        assert!(model.contains("common"));
        assert!(!model.contains("rare"));
    }

    #[test]
    fn test_max_distance_clamped() {
        assert_eq!(SpellOptions::default().with_max_distance(0).max_distance, 1);
        assert_eq!(SpellOptions::default().with_max_distance(9).max_distance, 2);
    }

    #[test]
    fn test_english_is_default() {
        let model = SpellModel::default();
        assert!(model.len() > 1000);
        assert!(model.contains("flooding"));
        assert!(model.contains("help"));
        assert!(model.frequency("the") > model.frequency("flooding"));
        assert!(SpellModel::empty().is_empty());
    }

    #[test]
    fn test_english_knows_emoji_names() {
        let model = SpellModel::english();
        for word in ["face", "tears", "joy", "zany", "shushing"] {
            assert!(model.contains(word), "{}", word);
        }
    }

    #[test]
    fn test_english_shares_vocabulary() {
        let a = SpellModel::english();
        let b = SpellModel::english().with_options(SpellOptions::default().with_max_distance(1));
        assert!(Arc::ptr_eq(&a.counts, &b.counts));
        assert_eq!(b.options().max_distance, 1);
    }

    #[test]
    fn test_load_word_lines() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "# word counts\nflood 120\nrescue 45\nshelter").unwrap();

        let model = SpellModel::load(file.path()).unwrap();
        assert_eq!(model.frequency("flood"), Some(120));
        assert_eq!(model.frequency("shelter"), Some(1));
    }

    #[test]
    fn test_load_json_counts() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"storm": 10, "water": 7}}"#).unwrap();

        let model = SpellModel::load(file.path()).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.frequency("storm"), Some(10));
    }

    #[test]
    fn test_load_rejects_bad_count() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "flood many").unwrap();

        let result = SpellModel::load(file.path());
        assert!(matches!(result, Err(crate::Error::Resource { .. })));
    }
}
