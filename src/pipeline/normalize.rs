//! Case, punctuation and digit normalization.

use super::emoji;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Lowercases text, replaces punctuation with spaces and removes digits.
///
/// - Unicode NFC composition, so accented letters are single characters
/// - Lowercasing
/// - Every character that is neither alphanumeric nor whitespace becomes
///   one space
/// - Numeric characters are removed
///
/// Recognized emoji pass through untouched for the emoji stage. Runs of
/// spaces are left in place.
pub fn normalize(input: &str) -> String {
    let lowered = input.nfc().collect::<String>().to_lowercase();
    let mut result = String::with_capacity(lowered.len());

    for grapheme in lowered.graphemes(true) {
        if emoji::is_emoji(grapheme) {
            result.push_str(grapheme);
            continue;
        }

        for c in grapheme.chars() {
            if c.is_numeric() {
                continue;
            }
            if c.is_alphanumeric() || c.is_whitespace() {
                result.push(c);
            } else {
                result.push(' ');
            }
        }
    }

    result
}
