//! Diagnostics collected during a load.
//!
//! Entries are returned to the caller instead of going through a global
//! logger, so a load stays a pure function of its input. Each entry is also
//! forwarded to the `log` facade for applications that install a logger.

use serde::{Deserialize, Serialize};

/// Diagnostic level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// A single diagnostic entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    /// Row index (0-based, data rows only) the entry refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: Level::Info, message: message.into(), row: None }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: Level::Success, message: message.into(), row: None }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: Level::Warning, message: message.into(), row: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into(), row: None }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

/// Ordered collection of diagnostics for one load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry
    pub fn push(&mut self, entry: Diagnostic) {
        match entry.level {
            Level::Info | Level::Success => log::debug!("{}", entry.message),
            Level::Warning => log::warn!("{}", entry.message),
            Level::Error => log::error!("{}", entry.message),
        }
        self.entries.push(entry);
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.push(Diagnostic::info(msg));
    }

    pub fn success(&mut self, msg: impl Into<String>) {
        self.push(Diagnostic::success(msg));
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.push(Diagnostic::warning(msg));
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.push(Diagnostic::error(msg));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Entries at `level`
    pub fn with_level(&self, level: Level) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.level == level)
    }

    pub fn has_warnings(&self) -> bool {
        self.with_level(Level::Warning).next().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render an entry for terminal output
pub fn format_diagnostic(entry: &Diagnostic) -> String {
    let prefix = match entry.level {
        Level::Info => "   ",
        Level::Success => "   ✓",
        Level::Warning => "   ⚠️",
        Level::Error => "   ❌",
    };
    match entry.row {
        Some(row) => format!("{} [row {}] {}", prefix, row, entry.message),
        None => format!("{} {}", prefix, entry.message),
    }
}
