//! Delimited-text (CSV/TSV) datasets.

use crate::error::Result;
use crate::model::{Cell, Table};
use std::io::{Read, Write};

/// Reads a table whose first record is the header row.
///
/// Empty fields become [`Cell::Empty`]; every other field is text. Ragged
/// rows are padded or truncated to the header width.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut table = Table::new(headers.iter().map(|h| h.trim_start_matches('\u{FEFF}')));

    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(Cell::text).collect());
    }

    Ok(table)
}

/// Writes a header row followed by every data row.
pub fn write_delimited<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    writer.flush()?;
    Ok(())
}
