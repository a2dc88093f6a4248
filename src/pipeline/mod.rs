//! # Normalization Pipeline
//!
//! A 7-stage pipeline turning one raw tweet into normalized text.
//!
//! ## Pipeline Stages
//!
//! 1. **Strip Patterns** - HTML tags, mentions, hashtags, URLs
//! 2. **Normalize** - NFC, lowercase, punctuation to spaces, digit removal
//! 3. **Translate Emoji** - emoji glyphs to their names
//! 4. **Expand Abbreviations** - chat abbreviations to phrases
//! 5. **Correct Spelling** - frequency-ranked edit-distance correction
//! 6. **Filter Stopwords** - word tokenization, stopword removal
//! 7. **Strip Non-ASCII** - remaining multi-byte characters
//!
//! The order is fixed by [`Stage::ALL`]. Each stage is a total function over
//! strings; none can fail.

mod ascii;
mod emoji;
mod expand;
mod filter;
mod normalize;
mod spelling;
mod strip;

pub use ascii::strip_non_ascii;
pub use emoji::translate_emoji;
pub(crate) use emoji::spoken_name;
pub use expand::expand_abbreviations;
pub use filter::filter_stopwords;
pub use normalize::normalize;
pub use spelling::{correct_spelling, correct_word, SpellCache};
pub use strip::strip_patterns;

use crate::model::Corpus;
use crate::resources::Resources;
use rayon::prelude::*;
use std::fmt;

/// One pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Remove tags, mentions, hashtags and URLs.
    StripPatterns,
    /// Lowercase, replace punctuation, remove digits.
    Normalize,
    /// Replace emoji with their names.
    TranslateEmoji,
    /// Expand chat abbreviations.
    ExpandAbbreviations,
    /// Correct token spelling.
    CorrectSpelling,
    /// Tokenize and drop stopwords.
    FilterStopwords,
    /// Drop non-ASCII characters.
    StripNonAscii,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::StripPatterns,
        Stage::Normalize,
        Stage::TranslateEmoji,
        Stage::ExpandAbbreviations,
        Stage::CorrectSpelling,
        Stage::FilterStopwords,
        Stage::StripNonAscii,
    ];

    /// Short identifier.
    pub fn name(self) -> &'static str {
        match self {
            Stage::StripPatterns => "strip-patterns",
            Stage::Normalize => "normalize",
            Stage::TranslateEmoji => "translate-emoji",
            Stage::ExpandAbbreviations => "expand-abbreviations",
            Stage::CorrectSpelling => "correct-spelling",
            Stage::FilterStopwords => "filter-stopwords",
            Stage::StripNonAscii => "strip-non-ascii",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fixed stage sequence bound to one run's resources.
#[derive(Debug, Clone)]
pub struct Pipeline {
    resources: Resources,
    correct_spelling: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Resources::default())
    }
}

impl Pipeline {
    /// Creates a pipeline over `resources` with spelling correction enabled.
    pub fn new(resources: Resources) -> Self {
        Self {
            resources,
            correct_spelling: true,
        }
    }

    /// Turns the spelling stage into a plain whitespace rejoin.
    pub fn without_spelling(self) -> Self {
        self.with_spelling(false)
    }

    /// Enables or disables the spelling stage.
    pub fn with_spelling(mut self, enabled: bool) -> Self {
        self.correct_spelling = enabled;
        self
    }

    /// Returns true if the spelling stage corrects tokens.
    pub fn corrects_spelling(&self) -> bool {
        self.correct_spelling
    }

    /// The resources this pipeline reads.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Applies a single stage.
    pub fn apply(&self, stage: Stage, input: &str, cache: &mut SpellCache) -> String {
        match stage {
            Stage::StripPatterns => strip_patterns(input),
            Stage::Normalize => normalize(input),
            Stage::TranslateEmoji => translate_emoji(input),
            Stage::ExpandAbbreviations => {
                expand_abbreviations(input, &self.resources.abbreviations)
            }
            Stage::CorrectSpelling if self.correct_spelling => {
                correct_spelling(input, &self.resources.dictionary, cache)
            }
            Stage::CorrectSpelling => input.split_whitespace().collect::<Vec<_>>().join(" "),
            Stage::FilterStopwords => filter_stopwords(input, &self.resources.stopwords),
            Stage::StripNonAscii => strip_non_ascii(input),
        }
    }

    /// Normalizes one text value.
    pub fn run(&self, input: &str) -> String {
        self.run_with_cache(input, &mut SpellCache::new())
    }

    /// Normalizes one text value, memoizing corrections in `cache`.
    pub fn run_with_cache(&self, input: &str, cache: &mut SpellCache) -> String {
        Stage::ALL
            .iter()
            .fold(input.to_string(), |text, &stage| self.apply(stage, &text, cache))
    }

    /// Runs every stage and returns each stage's output.
    pub fn trace(&self, input: &str) -> Vec<(Stage, String)> {
        let mut cache = SpellCache::new();
        let mut text = input.to_string();
        let mut steps = Vec::with_capacity(Stage::ALL.len());

        for stage in Stage::ALL {
            text = self.apply(stage, &text, &mut cache);
            steps.push((stage, text.clone()));
        }

        steps
    }

    /// Fills `normalized_text` for every record of `corpus`.
    ///
    /// With `parallel`, records are spread over the rayon pool and each
    /// worker keeps its own spelling cache. Record order is unaffected.
    pub fn normalize_corpus(&self, corpus: &mut Corpus, parallel: bool) {
        if parallel {
            corpus
                .records
                .par_iter_mut()
                .for_each_init(SpellCache::new, |cache, record| {
                    record.normalized_text = self.run_with_cache(record.raw_text.as_str(), cache);
                });
        } else {
            let mut cache = SpellCache::new();
            for record in &mut corpus.records {
                record.normalized_text = self.run_with_cache(record.raw_text.as_str(), &mut cache);
            }
            tracing::debug!(
                distinct_tokens = cache.len(),
                cache_hits = cache.hits(),
                "spelling cache"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{SpellModel, StopwordSet};

    fn is_clean(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_lowercase() || c == ' ')
            && !text.contains("  ")
            && text.trim() == text
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::ALL[0], Stage::StripPatterns);
        assert_eq!(Stage::ALL[6], Stage::StripNonAscii);
        assert_eq!(Stage::ExpandAbbreviations.to_string(), "expand-abbreviations");
    }

    #[test]
    fn test_full_pipeline_tweet() {
        let pipeline = Pipeline::default();
        assert_eq!(
            pipeline.run("Check this out!! http://t.co/xyz #Harvey OMG thnx!!"),
            "check oh god thanks"
        );
    }

    #[test]
    fn test_trace_steps() {
        let pipeline = Pipeline::default();
        let steps = pipeline.trace("Check this out!! http://t.co/xyz #Harvey OMG thnx!!");
        assert_eq!(steps.len(), 7);
        assert_eq!(steps[0].1, "Check this out!!   OMG thnx!!");
        assert_eq!(steps[3].1, "check this out oh my god thanks");
        assert_eq!(steps[6].1, "check oh god thanks");
    }

    #[test]
    fn test_url_and_case_variants_collide() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.run("Stay safe! http://x"), pipeline.run("STAY SAFE!"));
        assert_eq!(pipeline.run("STAY SAFE!"), "stay safe");
    }

    #[test]
    fn test_empty_input() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.run(""), "");
        assert_eq!(pipeline.run("@user #tag http://x"), "");
    }

    #[test]
    fn test_emoji_named() {
        let resources = Resources::default().with_stopwords(StopwordSet::empty());
        let pipeline = Pipeline::new(resources);
        assert_eq!(pipeline.run("Rescued!😂"), "rescued face with tears of joy");
    }

    #[test]
    fn test_spelling_applied_after_expansion() {
        let dictionary = SpellModel::from_counts([("thanks", 10), ("rescue", 10), ("team", 10)]);
        let resources = Resources::default().with_dictionary(dictionary);
        let pipeline = Pipeline::new(resources.clone());
        assert_eq!(pipeline.run("thx rescu team"), "thanks rescue team");

        let pipeline = Pipeline::new(resources).without_spelling();
        assert_eq!(pipeline.run("thx rescu team"), "thanks rescu team");
    }

    #[test]
    fn test_output_character_class() {
        let pipeline = Pipeline::default();
        let inputs = [
            "RT @KHOU: Flooding on I-45 😱😱 #HurricaneHarvey https://t.co/abc",
            "<p>Água 100% çà!!</p> idk, tbh… 日本語",
            "\t\n  ",
            "Cat5 storm_surge ½ ² ①",
            "👩‍🚒🇺🇸 🥇",
        ];
        for input in inputs {
            let output = pipeline.run(input);
            assert!(is_clean(&output), "{:?} -> {:?}", input, output);
        }
    }

    #[test]
    fn test_normalize_corpus_parallel_matches_sequential() {
        let pipeline = Pipeline::default();
        let texts: Vec<String> = (0..200)
            .map(|i| format!("Tweet {} OMG pls help @user{} #Harvey", i, i % 7))
            .collect();

        let mut parallel = Corpus::from_texts(texts.iter().map(|t| Some(t.as_str())));
        let mut sequential = parallel.clone();
        pipeline.normalize_corpus(&mut parallel, true);
        pipeline.normalize_corpus(&mut sequential, false);

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.records[0].normalized_text, "tweet oh god please help");
    }

    #[test]
    fn test_absent_text_normalizes_to_empty() {
        let pipeline = Pipeline::default();
        let mut corpus = Corpus::from_texts([None, Some("hello")]);
        pipeline.normalize_corpus(&mut corpus, false);
        assert_eq!(corpus.records[0].normalized_text, "");
        assert_eq!(corpus.records[1].normalized_text, "hello");
    }
}
