//! Emptiness and type coercion helpers.
//!
//! Every coercion checks emptiness first: an empty value always coerces to
//! `None`, never to an error.

use crate::error::NormalizeError;
use crate::models::RawValue;

/// Values read as `false` by [`coerce_bool`], after lower-casing.
const FALSE_WORDS: [&str; 3] = ["0", "false", "none"];

/// A non-empty value that does not fit the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceError {
    pub value: String,
    pub expected: &'static str,
}

impl CoerceError {
    fn new(value: &RawValue, expected: &'static str) -> Self {
        Self {
            value: value.to_text().unwrap_or_default(),
            expected,
        }
    }

    /// Attach the row and field the value came from.
    pub fn at(self, row: usize, field: impl Into<String>) -> NormalizeError {
        NormalizeError::Coercion {
            row,
            field: field.into(),
            value: self.value,
            expected: self.expected,
        }
    }
}

/// True iff `value` is absent, NaN or the empty string.
pub fn is_empty(value: &RawValue) -> bool {
    value.is_empty()
}

/// Text form, or `None` when empty.
pub fn coerce_string(value: &RawValue) -> Option<String> {
    value.to_text()
}

/// Integer form, or `None` when empty.
///
/// Floats are truncated toward zero, booleans read as 0/1, strings are
/// trimmed and parsed as signed decimal.
pub fn coerce_int(value: &RawValue) -> Result<Option<i64>, CoerceError> {
    if value.is_empty() {
        return Ok(None);
    }
    let int = match value {
        RawValue::Int(i) => Some(*i),
        RawValue::Bool(b) => Some(i64::from(*b)),
        RawValue::Float(x) => float_to_int(*x),
        RawValue::Str(s) => s.trim().parse::<i64>().ok(),
        RawValue::Absent => None,
    };
    int.map(Some).ok_or_else(|| CoerceError::new(value, "an integer"))
}

fn float_to_int(x: f64) -> Option<i64> {
    let t = x.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

/// TCP port, or `None` when empty.
pub fn coerce_port(value: &RawValue) -> Result<Option<u16>, CoerceError> {
    match coerce_int(value)? {
        None => Ok(None),
        Some(p) => u16::try_from(p)
            .map(Some)
            .map_err(|_| CoerceError::new(value, "a port number (0-65535)")),
    }
}

/// Boolean form, or `None` when empty.
///
/// `"0"`, `"false"` and `"none"` (any case) are false, anything else is true.
pub fn coerce_bool(value: &RawValue) -> Option<bool> {
    let text = value.to_text()?.to_lowercase();
    Some(!FALSE_WORDS.contains(&text.as_str()))
}
