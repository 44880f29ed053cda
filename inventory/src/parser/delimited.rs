//! Delimited text (CSV, TSV, ...) with encoding and delimiter auto-detection.
//!
//! The first record holds the column names; every data cell is read as a
//! string. A cell missing from a short line reads as absent, cells beyond the
//! header are dropped and blank lines are skipped.

use std::io::Cursor;
use std::path::Path;

use super::RowSource;
use crate::error::{ReaderError, ReaderResult};
use crate::models::{RawValue, Row};

/// Delimiters tried by [`detect_delimiter`], in tie-break order.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the given encoding label.
///
/// UTF-8 falls back to lossy conversion; any other label must be known to
/// `encoding_rs`.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ReaderResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        label => {
            let enc = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| ReaderError::Encoding(format!("unknown encoding '{}'", encoding)))?;
            Ok(enc.decode(bytes).0.to_string())
        }
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to `,` when the line holds none of the candidates.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;

    for &sep in &CANDIDATE_DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Rows read from delimited text.
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    content: String,
    delimiter: char,
    encoding: String,
}

impl DelimitedSource {
    /// UTF-8 text, delimiter auto-detected.
    pub fn from_text(content: impl Into<String>) -> Self {
        let content = strip_bom(content.into());
        let delimiter = detect_delimiter(&content);
        Self {
            content,
            delimiter,
            encoding: "utf-8".to_string(),
        }
    }

    /// Raw bytes, encoding and delimiter auto-detected.
    ///
    /// Valid UTF-8 is always read as UTF-8; chardet only guesses for
    /// anything else.
    pub fn from_bytes(bytes: &[u8]) -> ReaderResult<Self> {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return Ok(Self::from_text(text));
        }
        let encoding = detect_encoding(bytes);
        Self::from_bytes_with_encoding(bytes, &encoding)
    }

    /// Raw bytes in a known encoding, delimiter auto-detected.
    pub fn from_bytes_with_encoding(bytes: &[u8], encoding: &str) -> ReaderResult<Self> {
        let content = decode_content(bytes, encoding)?;
        let mut source = Self::from_text(content);
        source.encoding = encoding.to_string();
        Ok(source)
    }

    /// Read a file, encoding and delimiter auto-detected.
    pub fn from_path(path: impl AsRef<Path>) -> ReaderResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Force a delimiter instead of the detected one.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

fn strip_bom(content: String) -> String {
    match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    }
}

impl RowSource for DelimitedSource {
    type Rows = DelimitedRows;

    fn into_rows(self) -> ReaderResult<DelimitedRows> {
        if self.content.trim().is_empty() {
            return Err(ReaderError::EmptyInput);
        }
        if !self.delimiter.is_ascii() {
            return Err(ReaderError::Parse {
                line: 1,
                message: format!("delimiter '{}' is not ASCII", self.delimiter),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter as u8)
            .has_headers(true)
            .flexible(true)
            .from_reader(Cursor::new(self.content));

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ReaderError::NoHeaders);
        }

        Ok(DelimitedRows {
            headers,
            records: reader.into_records(),
        })
    }
}

/// Lazy row iterator over delimited text.
pub struct DelimitedRows {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<Cursor<String>>,
}

impl std::fmt::Debug for DelimitedRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelimitedRows")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl DelimitedRows {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for DelimitedRows {
    type Item = ReaderResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };

        let mut row = Row::new();
        for (i, header) in self.headers.iter().enumerate() {
            let value = record.get(i).map(RawValue::from).unwrap_or(RawValue::Absent);
            row.insert(header.clone(), value);
        }
        Some(Ok(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(source: DelimitedSource) -> Vec<Row> {
        source
            .into_rows()
            .unwrap()
            .collect::<ReaderResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_simple_csv() {
        let rows = rows(DelimitedSource::from_text("name,hostname\nR1,10.0.0.1\nR2,10.0.0.2"));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value("name"), &RawValue::from("R1"));
        assert_eq!(rows[0].value("hostname"), &RawValue::from("10.0.0.1"));
        assert_eq!(rows[1].value("name"), &RawValue::from("R2"));
    }

    #[test]
    fn test_column_order_preserved() {
        let rows = rows(DelimitedSource::from_text("site,name,port\nNYC,R1,22"));
        let keys: Vec<&str> = rows[0].keys().collect();
        assert_eq!(keys, vec!["site", "name", "port"]);
    }

    #[test]
    fn test_quoted_values() {
        let rows = rows(DelimitedSource::from_text("name;descr\n\"R1\";\"core; floor 2\""));

        assert_eq!(rows[0].value("name"), &RawValue::from("R1"));
        assert_eq!(rows[0].value("descr"), &RawValue::from("core; floor 2"));
    }

    #[test]
    fn test_empty_and_missing_cells() {
        let rows = rows(DelimitedSource::from_text("name,port,owner\nR1,\nR2,22,ops,extra"));

        assert_eq!(rows[0].value("port"), &RawValue::from(""));
        assert_eq!(rows[0].get("owner"), Some(&RawValue::Absent));
        assert_eq!(rows[1].value("owner"), &RawValue::from("ops"));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let rows = rows(DelimitedSource::from_text("name,port\nR1,22\n\nR2,23\n"));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_bom_stripped() {
        let rows = rows(DelimitedSource::from_text("\u{feff}name,port\nR1,22"));
        assert_eq!(rows[0].value("name"), &RawValue::from("R1"));
    }

    #[test]
    fn test_empty_input_error() {
        let err = DelimitedSource::from_text("  \n").into_rows().unwrap_err();
        assert!(matches!(err, ReaderError::EmptyInput));
    }

    #[test]
    fn test_explicit_delimiter() {
        let source = DelimitedSource::from_text("name|port\nR1|22").with_delimiter('|');
        assert_eq!(source.delimiter(), '|');
        assert_eq!(rows(source)[0].value("port"), &RawValue::from("22"));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("name\nR1"), ',');
    }

    #[test]
    fn test_latin1_decoding() {
        // "name\nSociété" in ISO-8859-1
        let bytes: &[u8] = &[
            b'n', b'a', b'm', b'e', b'\n', 0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9,
        ];
        let source = DelimitedSource::from_bytes_with_encoding(bytes, "iso-8859-1").unwrap();
        assert_eq!(rows(source)[0].value("name"), &RawValue::from("Société"));
    }

    #[test]
    fn test_utf8_bytes_not_guessed() {
        let source = DelimitedSource::from_bytes("name,site\nR1,Zürich\n".as_bytes()).unwrap();
        assert_eq!(source.encoding(), "utf-8");
        assert_eq!(rows(source)[0].value("site"), &RawValue::from("Zürich"));
    }

    #[test]
    fn test_non_utf8_bytes_detected() {
        // "name\nZürich" with ü as a single ISO-8859-1 byte
        let bytes: &[u8] = &[b'n', b'a', b'm', b'e', b'\n', b'Z', 0xFC, b'r', b'i', b'c', b'h'];
        let source = DelimitedSource::from_bytes(bytes).unwrap();
        let rows = rows(source);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].value("name").is_empty());
    }

    #[test]
    fn test_unknown_encoding() {
        let err = decode_content(b"abc", "klingon-8").unwrap_err();
        assert!(matches!(err, ReaderError::Encoding(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        std::fs::write(&path, "name,hostname,netmiko_timeout\nR1,10.0.0.1,30\n").unwrap();

        let source = DelimitedSource::from_path(&path).unwrap();
        assert_eq!(source.delimiter(), ',');
        let rows = rows(source);
        assert_eq!(rows[0].value("netmiko_timeout"), &RawValue::from("30"));
    }

    #[test]
    fn test_missing_file() {
        let err = DelimitedSource::from_path("/nonexistent/inventory.csv").unwrap_err();
        assert!(matches!(err, ReaderError::Io(_)));
    }
}
