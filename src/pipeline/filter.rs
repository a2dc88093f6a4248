//! Word tokenization and stopword removal.

use crate::resources::StopwordSet;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text on Unicode word boundaries, drops stopwords and rejoins the
/// remaining words with single spaces, preserving order.
pub fn filter_stopwords(input: &str, stopwords: &StopwordSet) -> String {
    input
        .unicode_words()
        .filter(|word| !stopwords.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_tweet() {
        let stopwords = StopwordSet::english();
        assert_eq!(
            filter_stopwords("check this out oh my god thanks", &stopwords),
            "check oh god thanks"
        );
    }

    #[test]
    fn test_word_boundaries() {
        let stopwords = StopwordSet::new(["the"]);
        assert_eq!(filter_stopwords("the,storm;the end", &stopwords), "storm end");
    }

    #[test]
    fn test_match_is_exact() {
        let stopwords = StopwordSet::new(["the"]);
        assert_eq!(filter_stopwords("The theory", &stopwords), "The theory");
    }

    #[test]
    fn test_empty_set_keeps_all() {
        let stopwords = StopwordSet::empty();
        assert_eq!(filter_stopwords(" a  b ", &stopwords), "a b");
    }

    #[test]
    fn test_all_stopwords() {
        let stopwords = StopwordSet::english();
        assert_eq!(filter_stopwords("i don t know", &stopwords), "know");
        assert_eq!(filter_stopwords("it is what it is", &stopwords), "");
    }
}
