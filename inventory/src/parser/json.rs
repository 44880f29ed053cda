//! JSON records: an array of objects, one row per object.

use serde_json::Value;
use std::path::Path;

use super::RowSource;
use crate::error::{ReaderError, ReaderResult};
use crate::models::{RawValue, Row};

/// Rows from a JSON array of objects. Key order is kept.
#[derive(Debug, Clone)]
pub struct JsonRecordsSource {
    records: Vec<Value>,
}

impl JsonRecordsSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    pub fn from_text(json: &str) -> ReaderResult<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(records) => Ok(Self { records }),
            other => Err(ReaderError::Json(format!(
                "expected an array of objects, got {}",
                kind(&other)
            ))),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> ReaderResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_text(&content)
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl RowSource for JsonRecordsSource {
    type Rows = JsonRows;

    fn into_rows(self) -> ReaderResult<JsonRows> {
        Ok(JsonRows {
            records: self.records.into_iter().enumerate(),
        })
    }
}

/// Lazy row iterator over JSON records.
pub struct JsonRows {
    records: std::iter::Enumerate<std::vec::IntoIter<Value>>,
}

impl Iterator for JsonRows {
    type Item = ReaderResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let (i, record) = self.records.next()?;
        match record {
            Value::Object(map) => Some(Ok(map
                .into_iter()
                .map(|(k, v)| (k, RawValue::from(v)))
                .collect())),
            other => Some(Err(ReaderError::Json(format!(
                "record {} is {}, expected an object",
                i,
                kind(&other)
            )))),
        }
    }
}
