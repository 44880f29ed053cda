//! Spreadsheet grids.
//!
//! The grid's first row holds the column names. Cells keep their native type
//! (number, boolean, text, empty). A column whose header cell is empty is
//! skipped entirely.
//!
//! Workbook files (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with
//! `calamine`; only the first worksheet is used.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::RowSource;
use crate::error::{ReaderError, ReaderResult};
use crate::models::{RawValue, Row};

/// Rows from an in-memory sheet, header row first.
#[derive(Debug, Clone, Default)]
pub struct SheetSource {
    grid: Vec<Vec<RawValue>>,
}

impl SheetSource {
    pub fn new(grid: Vec<Vec<RawValue>>) -> Self {
        Self { grid }
    }

    /// Build from a separate header row and data rows.
    pub fn with_header(header: Vec<RawValue>, rows: Vec<Vec<RawValue>>) -> Self {
        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(header);
        grid.extend(rows);
        Self { grid }
    }

    /// Read the first worksheet of a workbook file.
    ///
    /// A workbook without worksheets reads as an empty grid.
    pub fn from_path(path: impl AsRef<Path>) -> ReaderResult<Self> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Ok(Self::default()),
        };

        let grid = range
            .rows()
            .map(|cells| cells.iter().map(cell_value).collect())
            .collect();
        Ok(Self { grid })
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

/// Workbook cell to raw value; dates, durations and cell errors keep their
/// text form.
fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Absent,
        Data::Int(i) => RawValue::Int(*i),
        Data::Float(f) => RawValue::Float(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::String(s) => RawValue::Str(s.clone()),
        other => RawValue::Str(other.to_string()),
    }
}

impl RowSource for SheetSource {
    type Rows = SheetRows;

    fn into_rows(self) -> ReaderResult<SheetRows> {
        let mut grid = self.grid.into_iter();
        let header = grid.next().ok_or(ReaderError::EmptyInput)?;

        let headers: Vec<Option<String>> = header.iter().map(RawValue::to_text).collect();
        if headers.iter().all(Option::is_none) {
            return Err(ReaderError::NoHeaders);
        }

        Ok(SheetRows { headers, rows: grid })
    }
}

/// Lazy row iterator over a sheet.
pub struct SheetRows {
    /// `None` marks a column without a header.
    headers: Vec<Option<String>>,
    rows: std::vec::IntoIter<Vec<RawValue>>,
}

impl Iterator for SheetRows {
    type Item = ReaderResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let cells = self.rows.next()?;
        let mut row = Row::new();
        for (cell, header) in cells.into_iter().zip(&self.headers) {
            if let Some(name) = header {
                row.insert(name.clone(), cell);
            }
        }
        Some(Ok(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[RawValue]) -> Vec<RawValue> {
        values.to_vec()
    }

    #[test]
    fn test_typed_cells_kept() {
        let source = SheetSource::with_header(
            cells(&["name".into(), "port".into(), "enabled".into()]),
            vec![cells(&["R1".into(), RawValue::Int(22), RawValue::Bool(true)])],
        );
        let rows: Vec<Row> = source.into_rows().unwrap().map(Result::unwrap).collect();

        assert_eq!(rows[0].value("port"), &RawValue::Int(22));
        assert_eq!(rows[0].value("enabled"), &RawValue::Bool(true));
    }

    #[test]
    fn test_empty_header_column_skipped() {
        let source = SheetSource::new(vec![
            cells(&["name".into(), RawValue::Absent, "".into(), "site".into()]),
            cells(&["R1".into(), "junk".into(), "more junk".into(), "NYC".into()]),
        ]);
        let rows: Vec<Row> = source.into_rows().unwrap().map(Result::unwrap).collect();

        let keys: Vec<&str> = rows[0].keys().collect();
        assert_eq!(keys, vec!["name", "site"]);
        assert_eq!(rows[0].value("site"), &RawValue::from("NYC"));
    }

    #[test]
    fn test_numeric_header_stringified() {
        let source = SheetSource::new(vec![
            cells(&["name".into(), RawValue::Int(2024)]),
            cells(&["R1".into(), "x".into()]),
        ]);
        let row = source.into_rows().unwrap().next().unwrap().unwrap();
        assert_eq!(row.value("2024"), &RawValue::from("x"));
    }

    #[test]
    fn test_short_row_and_nan_cells() {
        let source = SheetSource::new(vec![
            cells(&["name".into(), "port".into()]),
            cells(&["R1".into()]),
            cells(&["R2".into(), RawValue::Float(f64::NAN)]),
        ]);
        let rows: Vec<Row> = source.into_rows().unwrap().map(Result::unwrap).collect();

        assert!(rows[0].get("port").is_none());
        assert!(rows[1].value("port").is_empty());
    }

    #[test]
    fn test_empty_sheet() {
        assert!(matches!(
            SheetSource::new(vec![]).into_rows(),
            Err(ReaderError::EmptyInput)
        ));
        assert!(matches!(
            SheetSource::new(vec![cells(&[RawValue::Absent])]).into_rows(),
            Err(ReaderError::NoHeaders)
        ));
    }

    fn write_workbook(path: &Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "port").unwrap();
        sheet.write_string(0, 2, "site").unwrap();
        sheet.write_string(0, 3, "netmiko_fast_cli").unwrap();
        sheet.write_string(1, 0, "R1").unwrap();
        sheet.write_number(1, 1, 22).unwrap();
        sheet.write_string(1, 2, "Zürich").unwrap();
        sheet.write_boolean(1, 3, true).unwrap();
        sheet.write_string(2, 0, "R2").unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_from_path_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.xlsx");
        write_workbook(&path);

        let source = SheetSource::from_path(&path).unwrap();
        assert_eq!(source.len(), 3);
        let rows = crate::parser::collect_rows(source).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value("name"), &RawValue::from("R1"));
        assert_eq!(rows[0].value("port"), &RawValue::Float(22.0));
        assert_eq!(rows[0].value("site"), &RawValue::from("Zürich"));
        assert_eq!(rows[0].value("netmiko_fast_cli"), &RawValue::Bool(true));
        assert!(rows[1].value("port").is_empty());
    }

    #[test]
    fn test_from_path_xlsx_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.xlsx");
        write_workbook(&path);

        let report = crate::normalize::Normalizer::default()
            .load_source(SheetSource::from_path(&path).unwrap())
            .unwrap();
        let host = report.inventory.host("R1").unwrap();
        assert_eq!(host.port, Some(22));
        assert_eq!(host.metadata.value("site"), &RawValue::from("Zürich"));
    }

    #[test]
    fn test_from_path_not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "name,port\nR1,22\n").unwrap();

        let err = SheetSource::from_path(&path).unwrap_err();
        assert!(matches!(err, ReaderError::Sheet(_)));
    }
}
