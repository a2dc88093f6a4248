//! Corpus deduplication by normalized text.

use crate::model::Corpus;
use std::collections::HashSet;

/// Keeps the first record for each distinct `normalized_text` and drops the
/// rest, preserving order. Empty strings collapse like any other value.
///
/// Must run after every record has been normalized. Returns the number of
/// records removed.
pub fn deduplicate(corpus: &mut Corpus) -> usize {
    let before = corpus.len();

    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(before);
        corpus
            .records
            .iter()
            .map(|record| seen.insert(record.normalized_text.as_str()))
            .collect()
    };

    let mut keep = keep.into_iter();
    corpus.records.retain(|_| keep.next().unwrap_or(false));

    let removed = before - corpus.len();
    tracing::debug!(before, after = corpus.len(), removed, "deduplicated corpus");
    removed
}
