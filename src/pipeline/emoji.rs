//! Emoji to descriptive words.

use emojis::{Emoji, SkinTone};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Looks up a grapheme cluster in the emoji table.
///
/// Skin tone variants resolve to their base emoji. Presentation selectors
/// and tone modifiers are ignored when the exact sequence is not in the
/// table.
fn lookup(grapheme: &str) -> Option<&'static Emoji> {
    if grapheme.is_ascii() {
        return None;
    }

    let emoji = emojis::get(grapheme).or_else(|| {
        let base: String = grapheme
            .chars()
            .filter(|c| !matches!(c, '\u{FE0E}' | '\u{FE0F}' | '\u{1F3FB}'..='\u{1F3FF}'))
            .collect();
        if base.is_empty() || base == grapheme {
            None
        } else {
            emojis::get(&base)
        }
    })?;

    match emoji.skin_tone() {
        Some(SkinTone::Default) | None => Some(emoji),
        Some(_) => emoji.with_skin_tone(SkinTone::Default).or(Some(emoji)),
    }
}

/// Returns true if the grapheme cluster is a known emoji.
pub(crate) fn is_emoji(grapheme: &str) -> bool {
    lookup(grapheme).is_some()
}

/// Renders an emoji name as lowercase words separated by single spaces.
///
/// Accents are stripped (`Côte` becomes `cote`) so the words survive the
/// ASCII filter intact.
pub(crate) fn spoken_name(emoji: &Emoji) -> String {
    let cleaned: String = emoji
        .name()
        .nfd()
        .filter(|&c| !is_combining_mark(c))
        .map(|c| {
            if c.is_alphabetic() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces each known emoji with its name.
///
/// The name is padded with spaces so it never fuses with neighbouring words
/// (`"wow😂"` becomes `"wow face with tears of joy "`). Unknown glyphs pass
/// through unchanged.
pub fn translate_emoji(input: &str) -> String {
    let mut result = String::with_capacity(input.len());

    for grapheme in input.graphemes(true) {
        match lookup(grapheme) {
            Some(emoji) => {
                result.push(' ');
                result.push_str(&spoken_name(emoji));
                result.push(' ');
            }
            None => result.push_str(grapheme),
        }
    }

    result
}
