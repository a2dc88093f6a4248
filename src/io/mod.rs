//! Dataset readers and writers.
//!
//! Input: CSV, TSV and (with the `xlsx` feature) XLSX workbooks.
//! Output: CSV, TSV and JSON, chosen by the output path's extension.

mod delimited;
mod json;

#[cfg(feature = "xlsx")]
pub mod xlsx;

pub use delimited::{read_delimited, write_delimited};
pub use json::{table_to_json, write_json};

use crate::detect::{detect_format_from_extension, detect_format_from_path, FormatType};
use crate::error::{Error, Result};
use crate::model::Table;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Reads a dataset from a file path.
///
/// The format is detected from the extension and checked against the
/// file's leading bytes.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    tracing::debug!(path = %path.display(), %format, "reading dataset");

    match format {
        FormatType::Csv | FormatType::Tsv => {
            let reader = BufReader::new(File::open(path)?);
            read_delimited(reader, format.delimiter().unwrap_or(b','))
        }
        #[cfg(feature = "xlsx")]
        FormatType::Xlsx => xlsx::read_xlsx(path),
        #[cfg(not(feature = "xlsx"))]
        FormatType::Xlsx => Err(Error::UnsupportedFormat(
            "XLSX support requires 'xlsx' feature".into(),
        )),
        FormatType::Xls => Err(Error::UnsupportedFormat(
            "legacy .xls workbooks; save as .xlsx or .csv".into(),
        )),
        FormatType::Json => Err(Error::UnsupportedFormat(
            "JSON is an output format only".into(),
        )),
    }
}

/// Writes a dataset to a file path, choosing the format from its extension.
pub fn write_table(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = detect_format_from_extension(path)?;
    tracing::debug!(path = %path.display(), %format, rows = table.row_count(), "writing dataset");

    match format {
        FormatType::Csv | FormatType::Tsv => {
            let writer = BufWriter::new(File::create(path)?);
            write_delimited(table, writer, format.delimiter().unwrap_or(b','))
        }
        FormatType::Json => write_json(table, BufWriter::new(File::create(path)?)),
        FormatType::Xlsx | FormatType::Xls => Err(Error::UnsupportedFormat(format!(
            "writing {} files; use .csv, .tsv or .json",
            format
        ))),
    }
}
