//! JSON output: an array with one object per row.

use crate::error::Result;
use crate::model::Table;
use serde_json::{Map, Value};
use std::io::Write;

/// Converts a table into a JSON array of row objects keyed by column name.
pub fn table_to_json(table: &Table) -> Result<Value> {
    let mut rows = Vec::with_capacity(table.row_count());
    for row in &table.rows {
        let mut object = Map::with_capacity(table.columns.len());
        for (column, cell) in table.columns.iter().zip(row) {
            object.insert(column.clone(), serde_json::to_value(cell)?);
        }
        rows.push(Value::Object(object));
    }
    Ok(Value::Array(rows))
}

/// Writes a table as pretty-printed JSON.
pub fn write_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    let value = table_to_json(table)?;
    serde_json::to_writer_pretty(&mut writer, &value)?;
    writer.write_all(b"\n")?;
    Ok(())
}
