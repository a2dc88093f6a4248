//! Records and the corpus they form.

use super::Cell;
use serde::Serialize;

/// Raw text value of one record, as found in the source dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum RawText {
    /// A string value.
    Text(String),
    /// A non-string value (number, boolean).
    Other,
    /// No value.
    #[default]
    Absent,
}

impl RawText {
    /// Returns the text handed to the pipeline: the string itself, or the
    /// empty string for anything that is not text.
    pub fn as_str(&self) -> &str {
        match self {
            RawText::Text(s) => s,
            RawText::Other | RawText::Absent => "",
        }
    }
}

impl From<&Cell> for RawText {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Text(s) => RawText::Text(s.clone()),
            Cell::Number(_) | Cell::Bool(_) => RawText::Other,
            Cell::Empty => RawText::Absent,
        }
    }
}

impl From<Option<&str>> for RawText {
    fn from(value: Option<&str>) -> Self {
        value.map_or(RawText::Absent, |s| RawText::Text(s.to_string()))
    }
}

/// One corpus entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Position in the source dataset.
    pub index: usize,
    /// Original text value.
    pub raw_text: RawText,
    /// Pipeline output.
    pub normalized_text: String,
}

/// Ordered sequence of records.
///
/// Built from a source, populated once by the pipeline, then reduced by the
/// deduplicator. Record order always follows the source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Corpus {
    /// Records in source order.
    pub records: Vec<Record>,
}

impl Corpus {
    /// Builds an un-normalized corpus from raw values in source order.
    pub fn from_raw(values: impl IntoIterator<Item = RawText>) -> Self {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(index, raw_text)| Record {
                index,
                raw_text,
                normalized_text: String::new(),
            })
            .collect();
        Self { records }
    }

    /// Builds a corpus from plain optional strings.
    pub fn from_texts<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        Self::from_raw(values.into_iter().map(RawText::from))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the corpus has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Source positions of the records, in order.
    pub fn indices(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.index).collect()
    }

    /// Normalized texts, in order.
    pub fn normalized(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.normalized_text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_text_from_cell() {
        assert_eq!(RawText::from(&Cell::text("hi")).as_str(), "hi");
        assert_eq!(RawText::from(&Cell::Number(3.0)), RawText::Other);
        assert_eq!(RawText::from(&Cell::Empty), RawText::Absent);
        assert_eq!(RawText::Other.as_str(), "");
    }

    #[test]
    fn test_corpus_keeps_source_positions() {
        let corpus = Corpus::from_texts([Some("a"), None, Some("c")]);
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.indices(), vec![0, 1, 2]);
        assert_eq!(corpus.records[1].raw_text, RawText::Absent);
    }
}
