//! Error types for the tweetnorm library.
//!
//! Only the dataset and resource layers can fail. The text pipeline itself is
//! a chain of total functions and has no error path.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tweetnorm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tweetnorm library.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The dataset format is not recognized.
    #[error("Unknown dataset format")]
    UnknownFormat,

    /// The dataset format is recognized but not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The dataset contains no data rows.
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// The configured text column is not present in the dataset.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// Delimited-text parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// ZIP archive parsing error (XLSX).
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// XML parsing error (XLSX).
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Required workbook part is missing.
    #[error("Missing required component: {0}")]
    MissingComponent(String),

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A static resource file (abbreviations, stopwords, dictionary) is malformed.
    #[error("Invalid resource {}: {message}", .path.display())]
    Resource { path: PathBuf, message: String },

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

#[cfg(feature = "xlsx")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

#[cfg(feature = "xlsx")]
impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}
