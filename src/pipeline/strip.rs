//! Markup, mention, hashtag and URL removal.

use regex::Regex;
use std::sync::LazyLock;

/// HTML-tag-like span, shortest match.
const HTML_TAG: &str = r"<.*?>";

/// `@user` mention.
const MENTION: &str = r"@\w+";

/// `#topic` hashtag.
const HASHTAG: &str = r"#\w+";

/// `http...` or `www...` up to the next whitespace.
const URL: &str = r"http\S+|www\S+";

// One alternation so that matches are taken left to right without overlap.
static RE_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&[HTML_TAG, MENTION, HASHTAG, URL].join("|")).unwrap());

/// Removes tags, mentions, hashtags and URLs.
///
/// Matched spans are replaced with nothing, so the words around them may
/// merge. Removal repeats until no pattern matches, so a span exposed by an
/// earlier removal (`h<b>ttp://x`) is removed as well.
pub fn strip_patterns(input: &str) -> String {
    let mut result = RE_STRIP.replace_all(input, "").into_owned();
    while RE_STRIP.is_match(&result) {
        result = RE_STRIP.replace_all(&result, "").into_owned();
    }
    result
}
