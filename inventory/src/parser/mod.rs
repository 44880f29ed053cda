//! Row sources.
//!
//! Every source yields the same shape: an ordered [`Row`] per record, column
//! name to [`crate::models::RawValue`]. Sources are consumed once.
//!
//! - [`DelimitedSource`] - CSV / TSV text with encoding and delimiter detection
//! - [`SheetSource`] - Spreadsheet grid with typed cells
//! - [`JsonRecordsSource`] - JSON array of objects
//!
//! [`InputFormat::from_path`] picks the source for a file by extension.

pub mod delimited;
pub mod json;
pub mod sheet;

use std::path::Path;

use crate::error::ReaderResult;
use crate::models::Row;

pub use delimited::{
    decode_content, detect_delimiter, detect_encoding, DelimitedRows, DelimitedSource,
};
pub use json::{JsonRecordsSource, JsonRows};
pub use sheet::{SheetRows, SheetSource};

/// File formats a table can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// CSV, TSV and other delimited text; the fallback for unknown extensions.
    Delimited,
    /// JSON array of objects.
    Json,
    /// Spreadsheet workbook.
    Sheet,
}

impl InputFormat {
    /// Guess the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => InputFormat::Json,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => InputFormat::Sheet,
            _ => InputFormat::Delimited,
        }
    }
}

/// A finite, non-restartable sequence of rows.
pub trait RowSource {
    type Rows: Iterator<Item = ReaderResult<Row>>;

    /// Consume the source. Header problems are reported here, per-row
    /// problems by the iterator.
    fn into_rows(self) -> ReaderResult<Self::Rows>;
}

impl RowSource for Vec<Row> {
    type Rows = std::iter::Map<std::vec::IntoIter<Row>, fn(Row) -> ReaderResult<Row>>;

    fn into_rows(self) -> ReaderResult<Self::Rows> {
        Ok(self.into_iter().map(Ok as fn(Row) -> ReaderResult<Row>))
    }
}

/// Read every row of a source into memory.
pub fn collect_rows<S: RowSource>(source: S) -> ReaderResult<Vec<Row>> {
    source.into_rows()?.collect()
}
