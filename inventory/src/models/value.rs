//! Raw cell values and ordered column maps.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// =============================================================================
// Raw Value
// =============================================================================

/// A single cell as produced by a row source.
///
/// Delimited text only ever yields [`RawValue::Str`] (or [`RawValue::Absent`]
/// for a missing trailing cell); spreadsheet and JSON sources keep the cell's
/// native type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// No value at all (missing cell, `null`).
    #[default]
    Absent,
    /// Boolean cell.
    Bool(bool),
    /// Integer cell.
    Int(i64),
    /// Floating point cell, possibly NaN.
    Float(f64),
    /// Text cell.
    Str(String),
}

impl RawValue {
    /// True iff the value carries no data: absent, NaN, or the empty string.
    ///
    /// Zero, `false` and whitespace-only strings are *not* empty.
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Absent => true,
            RawValue::Float(f) => f.is_nan(),
            RawValue::Str(s) => s.is_empty(),
            RawValue::Bool(_) | RawValue::Int(_) => false,
        }
    }

    /// Returns the value itself, or [`RawValue::Absent`] when it is empty.
    pub fn or_absent(&self) -> RawValue {
        if self.is_empty() {
            RawValue::Absent
        } else {
            self.clone()
        }
    }

    /// Text form of a non-empty value.
    ///
    /// Whole floats keep their `.0` (`22.0` stays `"22.0"`), booleans are
    /// `true`/`false`. Empty values have no text form.
    pub fn to_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            RawValue::Absent => None,
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Int(i) => Some(i.to_string()),
            RawValue::Float(x) => Some(format!("{:?}", x)),
            RawValue::Str(s) => Some(s.clone()),
        }
    }

    /// Get the text if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Absent => write!(f, "<absent>"),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Float(x) => write!(f, "{:?}", x),
            RawValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RawValue::Absent)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => RawValue::Absent,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => RawValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => RawValue::Str(s),
            other => RawValue::Str(other.to_string()),
        }
    }
}

// =============================================================================
// Field Map
// =============================================================================

static ABSENT: RawValue = RawValue::Absent;

/// Column name to value mapping that keeps insertion order.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap {
    entries: Vec<(String, RawValue)>,
}

/// One raw input record, column name to cell.
pub type Row = FieldMap;

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Like [`FieldMap::get`], but a missing column reads as absent.
    pub fn value(&self, key: &str) -> &RawValue {
        self.get(key).unwrap_or(&ABSENT)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, RawValue);
    type IntoIter = std::vec::IntoIter<(String, RawValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl fmt::Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}
