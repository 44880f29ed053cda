//! Error types for the table-to-inventory pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ReaderError`] - Row source errors (CSV, spreadsheet grid, JSON records)
//! - [`NormalizeError`] - Fatal conditions while turning rows into hosts
//! - [`ConfigError`] - Invalid load options or overlay rules
//! - [`LoadError`] - Top-level errors returned by a full load
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Row Source Errors
// =============================================================================

/// Errors produced while reading rows from a source.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode content.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Malformed delimited text.
    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Empty input.
    #[error("Input is empty")]
    EmptyInput,

    /// No header row found.
    #[error("No headers found")]
    NoHeaders,

    /// JSON input that is not an array of objects.
    #[error("Unsupported JSON records: {0}")]
    Json(String),

    /// Workbook file that could not be opened or read.
    #[error("Failed to read workbook: {0}")]
    Sheet(String),
}

impl From<csv::Error> for ReaderError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        ReaderError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReaderError {
    fn from(err: serde_json::Error) -> Self {
        ReaderError::Json(err.to_string())
    }
}

impl From<calamine::Error> for ReaderError {
    fn from(err: calamine::Error) -> Self {
        ReaderError::Sheet(err.to_string())
    }
}

// =============================================================================
// Normalization Errors
// =============================================================================

/// Fatal conditions raised while normalizing rows.
///
/// Any of these aborts the whole load; no partial inventory is returned.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A row has no usable `name`.
    #[error("Host name must not be empty (row {row}: {payload})")]
    EmptyName { row: usize, payload: String },

    /// A value could not be coerced to the type its field requires.
    #[error("Row {row}, field '{field}': cannot convert '{value}' to {expected}")]
    Coercion {
        row: usize,
        field: String,
        value: String,
        expected: &'static str,
    },

    /// Two rows share a name and duplicates are rejected.
    #[error("Row {row}: duplicate host name '{name}'")]
    DuplicateName { row: usize, name: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in load options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Overlay rule with an empty prefix.
    #[error("Overlay rule for profile '{0}' has an empty prefix")]
    EmptyPrefix(String),

    /// Overlay rule with an empty profile name.
    #[error("Overlay rule with prefix '{0}' has an empty profile name")]
    EmptyProfile(String),

    /// Two prefixes where one starts with the other.
    #[error("Overlay prefixes '{0}' and '{1}' overlap")]
    OverlappingPrefixes(String, String),

    /// The same profile configured twice.
    #[error("Overlay profile '{0}' is configured more than once")]
    DuplicateProfile(String),

    /// An option listed as both integer and boolean.
    #[error("Option '{option}' of profile '{profile}' is both integer and boolean")]
    ConflictingOption { profile: String, option: String },

    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`crate::config::LoadOptions`].
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Load Errors (top-level)
// =============================================================================

/// Top-level load errors.
///
/// This is the error type returned by [`crate::normalize::Normalizer::load_source`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// Row source error.
    #[error("Reader error: {0}")]
    Reader(#[from] ReaderError),

    /// Normalization error.
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for row sources.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for full loads.
pub type LoadResult<T> = Result<T, LoadError>;
