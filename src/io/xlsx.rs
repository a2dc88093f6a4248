//! XLSX (Office Open XML) workbook reader.
//!
//! XLSX files are ZIP archives of XML parts. Only the first worksheet is
//! read; its first row is the header.

use crate::error::{Error, Result};
use crate::model::{Cell, Table};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Workbook part paths.
mod paths {
    pub const WORKBOOK: &str = "xl/workbook.xml";
    pub const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
    pub const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
    pub const WORKSHEETS_DIR: &str = "xl/worksheets/";
}

/// ZIP container wrapper for XLSX files.
pub struct XlsxWorkbook {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl XlsxWorkbook {
    /// Opens a workbook from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Opens a workbook from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Opens a workbook from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self { archive })
    }

    /// Reads a part from the archive as UTF-8 string.
    fn read_part(&mut self, path: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Resolves the archive path of the first worksheet.
    pub fn first_sheet_path(&mut self) -> Result<String> {
        let workbook = self.read_part(paths::WORKBOOK)?;

        if let Some(rel_id) = first_sheet_rel_id(&workbook)? {
            if let Ok(rels) = self.read_part(paths::WORKBOOK_RELS) {
                if let Some(target) = relationship_target(&rels, &rel_id)? {
                    return Ok(resolve_target(&target));
                }
            }
        }

        // No usable relationship: fall back to the first worksheet part.
        let mut sheets: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| name.starts_with(paths::WORKSHEETS_DIR) && name.ends_with(".xml"))
            .filter(|name| !name[paths::WORKSHEETS_DIR.len()..].contains('/'))
            .map(str::to_string)
            .collect();
        sheets.sort();

        sheets
            .into_iter()
            .next()
            .ok_or_else(|| Error::MissingComponent("worksheet".into()))
    }

    /// Reads the shared string table. Workbooks without one yield an empty table.
    pub fn shared_strings(&mut self) -> Result<Vec<String>> {
        match self.read_part(paths::SHARED_STRINGS) {
            Ok(xml) => parse_shared_strings(&xml),
            Err(Error::MissingComponent(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Reads the first worksheet into a table.
    pub fn read_table(&mut self) -> Result<Table> {
        let shared = self.shared_strings()?;
        let sheet_path = self.first_sheet_path()?;
        let xml = self.read_part(&sheet_path)?;
        let rows = parse_sheet(&xml, &shared)?;

        tracing::debug!(sheet = %sheet_path, rows = rows.len(), "parsed worksheet");
        Ok(rows_to_table(rows))
    }
}

/// Reads the first worksheet of the workbook at `path`.
pub fn read_xlsx(path: impl AsRef<Path>) -> Result<Table> {
    XlsxWorkbook::open(path)?.read_table()
}

/// Splits the header row off and names blank headers like pandas does.
fn rows_to_table(rows: Vec<Vec<Cell>>) -> Table {
    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Cell::Empty => format!("Unnamed: {}", i),
            Cell::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            other => other.to_string(),
        })
        .collect();

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row);
    }
    table
}

/// How the value of a `<c>` element is encoded (its `t` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    Shared,
    InlineString,
    FormulaString,
    Boolean,
    Error,
    Date,
}

impl CellKind {
    fn from_attr(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("s") => CellKind::Shared,
            Some("inlineStr") => CellKind::InlineString,
            Some("str") => CellKind::FormulaString,
            Some("b") => CellKind::Boolean,
            Some("e") => CellKind::Error,
            Some("d") => CellKind::Date,
            _ => CellKind::Number,
        }
    }
}

/// A `<c>` element whose value has not been read yet.
struct PendingCell {
    column: Option<usize>,
    kind: CellKind,
}

impl PendingCell {
    fn from_start(e: &BytesStart) -> Result<Self> {
        let column = match get_attr_string(e, "r") {
            Some(reference) => column_index(&reference)?,
            None => None,
        };
        Ok(Self {
            column,
            kind: CellKind::from_attr(get_attr_string(e, "t")),
        })
    }

    fn resolve(&self, value: &str, shared: &[String]) -> Cell {
        match self.kind {
            CellKind::Shared => value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| shared.get(i))
                .map_or(Cell::Empty, |s| Cell::text(s.as_str())),
            CellKind::InlineString | CellKind::FormulaString | CellKind::Date => Cell::text(value),
            CellKind::Boolean => Cell::Bool(value.trim() == "1"),
            CellKind::Error => Cell::Empty,
            CellKind::Number => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Cell::Empty
                } else {
                    trimmed
                        .parse::<f64>()
                        .map_or_else(|_| Cell::text(trimmed), Cell::Number)
                }
            }
        }
    }
}

/// Number of columns in a worksheet (`A` through `XFD`).
const MAX_COLUMNS: usize = 16_384;

/// Converts the column letters of a cell reference ("AB12") to a 0-based index.
///
/// A reference without letters has no column. Columns past `XFD` are
/// rejected.
fn column_index(reference: &str) -> Result<Option<usize>> {
    let invalid = || Error::InvalidData(format!("cell reference '{}' is out of range", reference));

    let mut number = 0usize;
    let mut seen = false;
    for b in reference.bytes().take_while(u8::is_ascii_alphabetic) {
        let digit = (b.to_ascii_uppercase() - b'A' + 1) as usize;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .filter(|&n| n <= MAX_COLUMNS)
            .ok_or_else(invalid)?;
        seen = true;
    }

    Ok(seen.then(|| number - 1))
}

fn place(row: &mut Vec<Cell>, column: usize, cell: Cell) {
    if row.len() <= column {
        row.resize(column + 1, Cell::Empty);
    }
    row[column] = cell;
}

/// Parses `<sheetData>` rows.
fn parse_sheet(xml: &str, shared: &[String]) -> Result<Vec<Vec<Cell>>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut rows = Vec::new();
    let mut row: Vec<Cell> = Vec::new();
    let mut pending: Option<PendingCell> = None;
    let mut value = String::new();
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => row.clear(),
                b"c" => {
                    pending = Some(PendingCell::from_start(&e)?);
                    value.clear();
                }
                b"v" | b"t" if pending.is_some() => in_value = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => rows.push(Vec::new()),
                b"c" => {
                    let cell = PendingCell::from_start(&e)?;
                    let column = cell.column.unwrap_or(row.len());
                    place(&mut row, column, Cell::Empty);
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_value => {
                let text = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                value.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        let column = cell.column.unwrap_or(row.len());
                        place(&mut row, column, cell.resolve(&value, shared));
                    }
                }
                b"row" => rows.push(std::mem::take(&mut row)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

/// Parses `xl/sharedStrings.xml`. Phonetic runs (`<rPh>`) are skipped.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Ok(Event::Text(t)) if in_text && !in_phonetic => {
                if let Some(s) = current.as_mut() {
                    let text = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    s.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                b"si" => strings.extend(current.take()),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Finds the relationship id of the first `<sheet>` in workbook.xml.
fn first_sheet_rel_id(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                return Ok(get_attr_string(&e, "id"));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
}

/// Finds the target of relationship `id` in workbook.xml.rels.
fn relationship_target(xml: &str, id: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship"
                    && get_attr_string(&e, "Id").as_deref() == Some(id) =>
            {
                return Ok(get_attr_string(&e, "Target"));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
}

/// Turns a relationship target into an archive path.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// Gets a string attribute value by local name.
fn get_attr_string(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name.as_bytes() {
            if let Ok(val) = std::str::from_utf8(&attr.value) {
                return Some(val.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="tweets" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

    const SHARED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">
  <si><t>tweet_text</t></si>
  <si><t>id</t></si>
  <si><r><t>OMG </t></r><r><t>flooding &amp; rain</t></r></si>
  <si><t xml:space="preserve"> Stay safe! </t></si>
</sst>"#;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
    <row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>101</v></c></row>
    <row r="3"><c r="B3"><v>102</v></c></row>
    <row r="4"><c r="A4" t="inlineStr"><is><t>inline &lt;3</t></is></c><c r="B4" t="b"><v>1</v></c></row>
    <row r="5"><c r="A5" t="s"><v>3</v></c><c r="B5"><f>B4+1</f><v>104.5</v></c></row>
  </sheetData>
</worksheet>"#;

    /// Builds an XLSX archive from `(path, content)` parts.
    pub(crate) fn build_xlsx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        for (path, content) in parts {
            zip.start_file(*path, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
        buffer
    }

    pub(crate) fn sample_xlsx() -> Vec<u8> {
        build_xlsx(&[
            (paths::WORKBOOK, WORKBOOK),
            (paths::WORKBOOK_RELS, RELS),
            (paths::SHARED_STRINGS, SHARED),
            ("xl/worksheets/sheet1.xml", SHEET),
        ])
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1").unwrap(), Some(0));
        assert_eq!(column_index("Z9").unwrap(), Some(25));
        assert_eq!(column_index("AA10").unwrap(), Some(26));
        assert_eq!(column_index("ab3").unwrap(), Some(27));
        assert_eq!(column_index("XFD7").unwrap(), Some(MAX_COLUMNS - 1));
        assert_eq!(column_index("12").unwrap(), None);
    }

    #[test]
    fn test_column_index_out_of_range() {
        assert!(matches!(column_index("XFE1"), Err(Error::InvalidData(_))));
        assert!(matches!(
            column_index("ZZZZZZZZZZZZZZZ1"),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_sheet_with_oversized_reference() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="ZZZZZZZZZZZZZZZ1" t="inlineStr"><is><t>x</t></is></c></row>
  </sheetData>
</worksheet>"#;
        let data = build_xlsx(&[
            (paths::WORKBOOK, WORKBOOK),
            (paths::WORKBOOK_RELS, RELS),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);

        let mut workbook = XlsxWorkbook::from_bytes(data).unwrap();
        assert!(matches!(workbook.read_table(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_shared_strings_rich_text() {
        let strings = parse_shared_strings(SHARED).unwrap();
        assert_eq!(strings.len(), 4);
        assert_eq!(strings[2], "OMG flooding & rain");
        assert_eq!(strings[3], " Stay safe! ");
    }

    #[test]
    fn test_read_workbook() {
        let mut workbook = XlsxWorkbook::from_bytes(sample_xlsx()).unwrap();
        assert_eq!(workbook.first_sheet_path().unwrap(), "xl/worksheets/sheet1.xml");

        let table = workbook.read_table().unwrap();
        assert_eq!(table.columns, vec!["tweet_text", "id"]);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.rows[0][0], Cell::text("OMG flooding & rain"));
        assert_eq!(table.rows[0][1], Cell::Number(101.0));
        assert!(table.rows[1][0].is_empty());
        assert_eq!(table.rows[2][0], Cell::text("inline <3"));
        assert_eq!(table.rows[2][1], Cell::Bool(true));
        assert_eq!(table.rows[3][1], Cell::Number(104.5));
    }

    #[test]
    fn test_fallback_without_relationships() {
        let data = build_xlsx(&[
            (paths::WORKBOOK, WORKBOOK),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);
        let mut workbook = XlsxWorkbook::from_bytes(data).unwrap();
        let table = workbook.read_table().unwrap();
        // No shared strings: shared cells resolve to nothing.
        assert_eq!(table.columns, vec!["Unnamed: 0", "Unnamed: 1"]);
        assert_eq!(table.rows[2][0], Cell::text("inline <3"));
    }

    #[test]
    fn test_missing_workbook_part() {
        let data = build_xlsx(&[("xl/worksheets/sheet1.xml", SHEET)]);
        let mut workbook = XlsxWorkbook::from_bytes(data).unwrap();
        assert!(matches!(
            workbook.read_table(),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            XlsxWorkbook::from_bytes(b"tweet_text\nhello\n".to_vec()),
            Err(Error::ZipArchive(_))
        ));
    }
}
