//! Frequency-ranked spelling correction.
//!
//! A token is kept if the dictionary knows it. Otherwise every known word at
//! edit distance 1 (deletion, transposition, substitution, insertion) is a
//! candidate, then every known word at distance 2, and the most frequent
//! candidate wins. Ties go to the lexicographically greatest word so the
//! result never depends on hash order.

use crate::resources::SpellModel;
use std::collections::HashMap;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Memo of corrections made during one run.
///
/// The model is read-only, so a cached answer is always the answer a fresh
/// lookup would give. Each worker keeps its own cache.
#[derive(Debug, Default)]
pub struct SpellCache {
    entries: HashMap<String, String>,
    hits: usize,
}

impl SpellCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the correction for `token`, computing it on first use.
    pub fn correct(&mut self, token: &str, model: &SpellModel) -> &str {
        if self.entries.contains_key(token) {
            self.hits += 1;
        } else {
            let corrected = correct_word(token, model);
            self.entries.insert(token.to_string(), corrected);
        }
        &self.entries[token]
    }

    /// Number of distinct tokens seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

/// Corrects every whitespace-delimited token and rejoins with single spaces.
pub fn correct_spelling(input: &str, model: &SpellModel, cache: &mut SpellCache) -> String {
    let mut result = String::with_capacity(input.len());

    for token in input.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        if model.is_empty() {
            result.push_str(token);
        } else {
            result.push_str(cache.correct(token, model));
        }
    }

    result
}

/// Returns the most probable spelling of a single word.
///
/// Known words, single letters, words containing non-letters and words
/// with no known candidate are returned unchanged. Single letters are mostly
/// contraction fragments ("don t", "it s") left behind by punctuation removal.
pub fn correct_word(word: &str, model: &SpellModel) -> String {
    if word.chars().nth(1).is_none()
        || model.contains(word)
        || !word.chars().all(char::is_alphabetic)
    {
        return word.to_string();
    }

    let first = edits1(word);
    if let Some(best) = most_frequent(first.iter().map(String::as_str), model) {
        return best;
    }

    if model.options().max_distance >= 2 {
        let second = first.iter().flat_map(|edit| edits1(edit));
        let mut best: Option<(u64, String)> = None;
        for candidate in second {
            consider(&mut best, &candidate, model);
        }
        if let Some((_, word)) = best {
            return word;
        }
    }

    word.to_string()
}

fn most_frequent<'a>(
    candidates: impl Iterator<Item = &'a str>,
    model: &SpellModel,
) -> Option<String> {
    let mut best: Option<(u64, String)> = None;
    for candidate in candidates {
        consider(&mut best, candidate, model);
    }
    best.map(|(_, word)| word)
}

fn consider(best: &mut Option<(u64, String)>, candidate: &str, model: &SpellModel) {
    let Some(count) = model.frequency(candidate) else {
        return;
    };

    let better = match best {
        Some((best_count, best_word)) => (count, candidate) > (*best_count, best_word.as_str()),
        None => true,
    };
    if better {
        *best = Some((count, candidate.to_string()));
    }
}

/// All strings one edit away from `word`.
fn edits1(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut edits = Vec::with_capacity(n * 54 + 26);

    let join = |left: &[char], middle: &[char], right: &[char]| -> String {
        left.iter().chain(middle).chain(right).collect()
    };

    for i in 0..=n {
        let (left, right) = chars.split_at(i);

        if !right.is_empty() {
            edits.push(join(left, &[], &right[1..]));
        }

        if right.len() > 1 {
            edits.push(join(left, &[right[1], right[0]], &right[2..]));
        }

        for &letter in ALPHABET {
            let letter = letter as char;
            if let Some(&current) = right.first() {
                if current != letter {
                    edits.push(join(left, &[letter], &right[1..]));
                }
            }
            edits.push(join(left, &[letter], right));
        }
    }

    edits
}
