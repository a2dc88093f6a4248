//! Format detection for tabular datasets.

use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Magic bytes for OLE Compound File (legacy .xls)
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Magic bytes for ZIP archive (.xlsx)
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Supported dataset format types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Office Open XML workbook
    Xlsx,
    /// Legacy Excel 97-2003 workbook (detected, not readable)
    Xls,
    /// JSON array of row objects (output only)
    Json,
}

impl FormatType {
    /// Field delimiter for delimited-text formats.
    pub fn delimiter(self) -> Option<u8> {
        match self {
            FormatType::Csv => Some(b','),
            FormatType::Tsv => Some(b'\t'),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Csv => write!(f, "CSV"),
            FormatType::Tsv => write!(f, "TSV"),
            FormatType::Xlsx => write!(f, "XLSX"),
            FormatType::Xls => write!(f, "XLS"),
            FormatType::Json => write!(f, "JSON"),
        }
    }
}

/// Detect dataset format from a file extension.
pub fn detect_format_from_extension(path: impl AsRef<Path>) -> Result<FormatType> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => Ok(FormatType::Csv),
        "tsv" | "tab" => Ok(FormatType::Tsv),
        "xlsx" | "xlsm" => Ok(FormatType::Xlsx),
        "xls" => Ok(FormatType::Xls),
        "json" => Ok(FormatType::Json),
        "" => Err(Error::UnknownFormat),
        other => Err(Error::UnsupportedFormat(format!(
            ".{} files; use .csv, .tsv or .xlsx",
            other
        ))),
    }
}

/// Detect the format of an existing file.
///
/// The extension decides; workbook extensions are checked against the
/// file's magic bytes so a mislabelled file fails early.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let by_extension = detect_format_from_extension(path);
    let by_content = {
        let mut file = std::fs::File::open(path)?;
        detect_format(&mut file)
    };

    match (by_extension, by_content) {
        (Ok(ext @ (FormatType::Xlsx | FormatType::Xls)), Ok(found)) if found != ext => Err(
            Error::InvalidData(format!("file extension says {} but content is {}", ext, found)),
        ),
        (Ok(format), _) => Ok(format),
        (Err(Error::UnknownFormat), content) => content,
        (Err(e), _) => Err(e),
    }
}

/// Detect dataset format from a reader.
///
/// Workbooks are recognized by their container magic; anything else that
/// is valid UTF-8 is treated as delimited text.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<FormatType> {
    let mut buffer = [0u8; 512];

    reader.seek(SeekFrom::Start(0))?;
    let bytes_read = reader.read(&mut buffer)?;

    reader.seek(SeekFrom::Start(0))?;

    detect_format_from_bytes(&buffer[..bytes_read])
}

/// Detect dataset format from leading bytes.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if data.is_empty() {
        return Err(Error::InvalidData("Data too small".into()));
    }

    if data.len() >= 8 && data[..8] == OLE_MAGIC {
        return Ok(FormatType::Xls);
    }

    if data.len() >= 4 && data[..4] == ZIP_MAGIC {
        return Ok(FormatType::Xlsx);
    }

    // A multi-byte character may be cut at the end of the sample.
    match std::str::from_utf8(data) {
        Ok(_) => Ok(FormatType::Csv),
        Err(e) if e.error_len().is_none() => Ok(FormatType::Csv),
        Err(_) => Err(Error::UnknownFormat),
    }
}
