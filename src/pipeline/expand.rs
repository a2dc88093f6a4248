//! Chat abbreviation expansion.

use crate::resources::AbbreviationMap;

/// Replaces whitespace-delimited tokens found in `abbreviations` with their
/// expansions and rejoins with single spaces.
///
/// Single pass: an expansion is never looked up again.
pub fn expand_abbreviations(input: &str, abbreviations: &AbbreviationMap) -> String {
    input
        .split_whitespace()
        .map(|token| abbreviations.get(token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}
