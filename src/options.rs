//! Job options for dataset preprocessing.

/// Default column holding the raw tweet text.
pub const DEFAULT_TEXT_COLUMN: &str = "tweet_text";

/// Default column receiving the normalized text.
pub const DEFAULT_OUTPUT_COLUMN: &str = "processed_data";

/// Housekeeping columns removed from the output by default.
pub const DEFAULT_DROP_COLUMNS: &[&str] = &["text_info"];

/// Options for controlling a preprocessing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Column read as raw text.
    pub text_column: String,

    /// Column the normalized text is written to.
    pub output_column: String,

    /// Columns removed from the output when present.
    pub drop_columns: Vec<String>,

    /// Whether to normalize records on the rayon pool.
    pub parallel: bool,

    /// Whether the spelling stage runs.
    pub correct_spelling: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            output_column: DEFAULT_OUTPUT_COLUMN.to_string(),
            drop_columns: DEFAULT_DROP_COLUMNS.iter().map(|c| c.to_string()).collect(),
            parallel: true,
            correct_spelling: true,
        }
    }
}

impl PreprocessOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the raw text column.
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = column.into();
        self
    }

    /// Sets the output column.
    pub fn with_output_column(mut self, column: impl Into<String>) -> Self {
        self.output_column = column.into();
        self
    }

    /// Adds a column to drop from the output.
    pub fn with_drop_column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.drop_columns.contains(&column) {
            self.drop_columns.push(column);
        }
        self
    }

    /// Replaces the set of columns to drop.
    pub fn with_drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Skips spelling correction.
    pub fn without_spelling(mut self) -> Self {
        self.correct_spelling = false;
        self
    }
}
