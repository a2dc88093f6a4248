//! # tweetnorm
//!
//! Text normalization for social-media posts (tweets) ahead of NLP tasks
//! such as topic modelling.
//!
//! Every post runs through a fixed 7-stage [`Pipeline`]: markup and handle
//! stripping, case and punctuation normalization, emoji naming,
//! chat-abbreviation expansion, spelling correction, stopword removal and a
//! final ASCII filter. The normalized corpus is then deduplicated so each
//! distinct text survives once, in source order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tweetnorm::Preprocessor;
//!
//! fn main() -> tweetnorm::Result<()> {
//!     // Normalize a single post
//!     let preprocessor = Preprocessor::new();
//!     assert_eq!(preprocessor.normalize("STAY SAFE! http://t.co/x"), "stay safe");
//!
//!     // Normalize and deduplicate a whole dataset
//!     let summary = preprocessor.process_file("tweets.csv", "tweets_processed.csv")?;
//!     println!("{} rows kept", summary.output_rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `xlsx` (default): reading `.xlsx` workbooks

pub mod dedup;
pub mod detect;
pub mod error;
pub mod io;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod resources;

// Re-exports
pub use dedup::deduplicate;
pub use detect::{detect_format, detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use io::{read_table, write_table};
pub use model::{Cell, Corpus, RawText, Record, Table};
pub use options::PreprocessOptions;
pub use pipeline::{Pipeline, SpellCache, Stage};
pub use resources::{AbbreviationMap, Resources, SpellModel, SpellOptions, StopwordSet};

use std::path::{Path, PathBuf};

/// Normalizes one text value with the built-in resources.
///
/// # Example
///
/// ```
/// assert_eq!(tweetnorm::normalize_text("OMG thnx!!"), "oh god thanks");
/// ```
pub fn normalize_text(text: &str) -> String {
    Pipeline::default().run(text)
}

/// Processes a dataset file with default options and resources.
///
/// # Example
///
/// ```no_run
/// let summary = tweetnorm::process_file("tweets.csv", "tweets_processed.csv")?;
/// println!("removed {} duplicates", summary.duplicates_removed);
/// # Ok::<(), tweetnorm::Error>(())
/// ```
pub fn process_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ProcessSummary> {
    Preprocessor::new().process_file(input, output)
}

/// Returns `<stem>_processed.csv` next to `input`.
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_processed.csv", stem))
}

/// Counts reported by one preprocessing job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Data rows read.
    pub input_rows: usize,
    /// Data rows written.
    pub output_rows: usize,
    /// Rows dropped because their normalized text was already seen.
    pub duplicates_removed: usize,
    /// Rows whose normalized text was empty, counted before deduplication.
    pub empty_records: usize,
}

/// Builder for preprocessing jobs.
///
/// Holds the resources and options of a run. One value can process any
/// number of tables.
///
/// # Example
///
/// ```no_run
/// use tweetnorm::{Preprocessor, SpellModel};
///
/// let summary = Preprocessor::new()
///     .with_dictionary(SpellModel::load("words.txt")?)
///     .with_text_column("text")
///     .sequential()
///     .process_file("tweets.xlsx", "clean.csv")?;
/// # Ok::<(), tweetnorm::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    pipeline: Pipeline,
    options: PreprocessOptions,
}

impl Preprocessor {
    /// Creates a preprocessor with default resources and options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all resources.
    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.pipeline = Pipeline::new(resources).with_spelling(self.options.correct_spelling);
        self
    }

    /// Replaces the abbreviation table.
    pub fn with_abbreviations(self, abbreviations: AbbreviationMap) -> Self {
        let resources = self.pipeline.resources().clone();
        self.with_resources(resources.with_abbreviations(abbreviations))
    }

    /// Replaces the stopword set.
    pub fn with_stopwords(self, stopwords: StopwordSet) -> Self {
        let resources = self.pipeline.resources().clone();
        self.with_resources(resources.with_stopwords(stopwords))
    }

    /// Replaces the spelling dictionary.
    pub fn with_dictionary(self, dictionary: SpellModel) -> Self {
        let resources = self.pipeline.resources().clone();
        self.with_resources(resources.with_dictionary(dictionary))
    }

    /// Replaces all options.
    pub fn with_options(mut self, options: PreprocessOptions) -> Self {
        self.pipeline = self.pipeline.with_spelling(options.correct_spelling);
        self.options = options;
        self
    }

    /// Sets the raw text column.
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.options = self.options.with_text_column(column);
        self
    }

    /// Sets the output column.
    pub fn with_output_column(mut self, column: impl Into<String>) -> Self {
        self.options = self.options.with_output_column(column);
        self
    }

    /// Adds a column to drop from the output.
    pub fn with_drop_column(mut self, column: impl Into<String>) -> Self {
        self.options = self.options.with_drop_column(column);
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Skips spelling correction.
    pub fn without_spelling(mut self) -> Self {
        self.options = self.options.without_spelling();
        self.pipeline = self.pipeline.without_spelling();
        self
    }

    /// Returns the configured pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns the job options.
    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    /// Normalizes one text value.
    pub fn normalize(&self, text: &str) -> String {
        self.pipeline.run(text)
    }

    /// Normalizes and deduplicates the text column of `table`.
    ///
    /// Surviving rows keep their source order. The normalized text is
    /// written to the output column and the housekeeping columns are
    /// dropped.
    pub fn process_table(&self, mut table: Table) -> Result<(Table, ProcessSummary)> {
        let options = &self.options;

        if table.is_empty() {
            return Err(Error::EmptyDataset(format!(
                "no data rows under columns [{}]",
                table.columns.join(", ")
            )));
        }

        let column = table
            .column_index(&options.text_column)
            .ok_or_else(|| Error::MissingColumn(options.text_column.clone()))?;

        let input_rows = table.row_count();
        let mut corpus = Corpus::from_raw(table.column(column).map(RawText::from));

        self.pipeline.normalize_corpus(&mut corpus, options.parallel);
        let empty_records = corpus.normalized().filter(|text| text.is_empty()).count();

        let duplicates_removed = deduplicate(&mut corpus);
        table.retain_indices(&corpus.indices());
        table.set_column(
            &options.output_column,
            corpus
                .records
                .into_iter()
                .map(|record| Cell::text(record.normalized_text)),
        );

        for name in &options.drop_columns {
            if *name != options.output_column && table.drop_column(name) {
                tracing::debug!(column = %name, "dropped column");
            }
        }

        let summary = ProcessSummary {
            input_rows,
            output_rows: table.row_count(),
            duplicates_removed,
            empty_records,
        };

        tracing::info!(
            input_rows,
            output_rows = summary.output_rows,
            duplicates_removed,
            empty_records,
            "processed dataset"
        );

        Ok((table, summary))
    }

    /// Reads `input`, processes it and writes the result to `output`.
    pub fn process_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<ProcessSummary> {
        let output = output.as_ref();
        let table = read_table(input)?;
        let (table, summary) = self.process_table(table)?;
        write_table(&table, output)?;
        tracing::info!(path = %output.display(), "wrote processed dataset");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["tweet_id", "tweet_text", "text_info"]);
        table.push_row(vec![Cell::Number(1.0), "Stay safe! http://x".into(), "other".into()]);
        table.push_row(vec![Cell::Number(2.0), "STAY SAFE!".into(), "other".into()]);
        table.push_row(vec![Cell::Number(3.0), Cell::Empty, "other".into()]);
        table.push_row(vec![Cell::Number(4.0), "OMG pls help @user".into(), "rescue".into()]);
        table.push_row(vec![Cell::Number(5.0), Cell::Number(42.0), "other".into()]);
        table
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text("Check this out!! http://t.co/xyz #Harvey OMG thnx!!"),
            "check oh god thanks"
        );
    }

    #[test]
    fn test_normalize_text_corrects_spelling() {
        assert!(!Resources::default().dictionary.is_empty());
        assert_eq!(
            normalize_text("Hurricane floding in Houstn, need hlep"),
            "hurricane flooding houston need help"
        );
        assert_eq!(normalize_text("I don't know, it's fine"), "know fine");
    }

    #[test]
    fn test_empty_dictionary_disables_correction() {
        let preprocessor = Preprocessor::new().with_dictionary(SpellModel::empty());
        assert_eq!(preprocessor.normalize("need hlep"), "need hlep");
    }

    #[test]
    fn test_process_table() {
        let (table, summary) = Preprocessor::new().process_table(sample()).unwrap();

        assert_eq!(table.columns, vec!["tweet_id", "tweet_text", "processed_data"]);
        assert_eq!(
            summary,
            ProcessSummary {
                input_rows: 5,
                output_rows: 3,
                duplicates_removed: 2,
                empty_records: 2,
            }
        );

        let ids: Vec<_> = table.column(0).cloned().collect();
        assert_eq!(ids, vec![Cell::Number(1.0), Cell::Number(3.0), Cell::Number(4.0)]);

        let processed: Vec<_> = table.column(2).map(|c| c.to_string()).collect();
        assert_eq!(processed, vec!["stay safe", "", "oh god please help"]);
    }

    #[test]
    fn test_process_table_sequential_matches_parallel() {
        let parallel = Preprocessor::new().process_table(sample()).unwrap();
        let sequential = Preprocessor::new().sequential().process_table(sample()).unwrap();
        assert_eq!(parallel.0, sequential.0);
        assert_eq!(parallel.1, sequential.1);
    }

    #[test]
    fn test_process_table_custom_columns() {
        let mut table = Table::new(["text"]);
        table.push_row(vec!["idk lol".into()]);

        let (table, _) = Preprocessor::new()
            .with_text_column("text")
            .with_output_column("clean")
            .process_table(table)
            .unwrap();

        assert_eq!(table.columns, vec!["text", "clean"]);
        assert_eq!(table.rows[0][1], Cell::text("know lol"));
    }

    #[test]
    fn test_process_table_empty_dataset() {
        let table = Table::new(["tweet_text"]);
        assert!(matches!(
            Preprocessor::new().process_table(table),
            Err(Error::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_process_table_missing_column() {
        let mut table = Table::new(["text"]);
        table.push_row(vec!["hello".into()]);
        match Preprocessor::new().process_table(table) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "tweet_text"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_without_spelling_survives_resource_swap() {
        let preprocessor = Preprocessor::new()
            .without_spelling()
            .with_dictionary(SpellModel::from_counts([("rescue", 5)]));

        assert!(!preprocessor.pipeline().corrects_spelling());
        assert_eq!(preprocessor.normalize("rescu"), "rescu");

        let preprocessor = preprocessor.with_options(PreprocessOptions::default());
        assert_eq!(preprocessor.normalize("rescu"), "rescue");
    }

    #[test]
    fn test_process_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tweets.csv");
        std::fs::write(
            &input,
            "tweet_text,text_info\n\"Flooding, OMG!!\",x\nflooding omg,y\n,z\n",
        )
        .unwrap();

        let output = default_output_path(&input);
        let summary = process_file(&input, &output).unwrap();
        assert_eq!(summary.input_rows, 3);
        assert_eq!(summary.output_rows, 2);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "tweet_text,processed_data\n\"Flooding, OMG!!\",flooding oh god\n,\n"
        );
    }

    #[test]
    fn test_process_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            process_file(dir.path().join("absent.csv"), dir.path().join("out.csv")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("data/tweets.xlsx"),
            PathBuf::from("data/tweets_processed.csv")
        );
    }
}
