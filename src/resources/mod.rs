//! Static resources consumed by the pipeline.
//!
//! All three are built once before a run and only read afterwards, so a
//! single [`Resources`] value can be shared by reference across worker
//! threads without locking.

mod abbreviations;
mod dictionary;
mod stopwords;

pub use abbreviations::{AbbreviationMap, DEFAULT_ABBREVIATIONS};
pub use dictionary::{SpellModel, SpellOptions};
pub use stopwords::{StopwordSet, ENGLISH_STOPWORDS};

use crate::error::{Error, Result};
use std::path::Path;

/// The immutable lookup data for one run.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    /// Chat abbreviation expansions.
    pub abbreviations: AbbreviationMap,
    /// Tokens removed from the output.
    pub stopwords: StopwordSet,
    /// Word frequencies for spelling correction.
    pub dictionary: SpellModel,
}

impl Resources {
    /// Creates resources with the built-in abbreviation table, the English
    /// stopword lexicon and the bundled English spelling model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the abbreviation table.
    pub fn with_abbreviations(mut self, abbreviations: AbbreviationMap) -> Self {
        self.abbreviations = abbreviations;
        self
    }

    /// Replaces the stopword set.
    pub fn with_stopwords(mut self, stopwords: StopwordSet) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Replaces the spelling dictionary.
    pub fn with_dictionary(mut self, dictionary: SpellModel) -> Self {
        self.dictionary = dictionary;
        self
    }
}

/// Reads a resource file, mapping a missing file to [`Error::NotFound`].
pub(crate) fn read_resource(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Builds a [`Error::Resource`] for `path`.
pub(crate) fn resource_error(path: &Path, message: impl Into<String>) -> Error {
    Error::Resource {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
