//! # table-inventory - Flat device tables to a typed host inventory
//!
//! Turns human-authored tables (one row per network device, arbitrary
//! columns) into an inventory of connectable hosts with per-host connection
//! overlays.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CSV / Sheet │────▶│  RowSource  │────▶│ Normalizer  │────▶│  Inventory  │
//! │   / JSON    │     │ (ordered    │     │ (identity,  │     │ (hosts by   │
//! │             │     │   rows)     │     │ data, opts) │     │   name)     │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use table_inventory::{DelimitedSource, Normalizer};
//!
//! let source = DelimitedSource::from_path("inventory.csv")?;
//! let report = Normalizer::default().load_source(source)?;
//! for (name, host) in &report.inventory.hosts {
//!     println!("{} -> {}", name, host.address());
//! }
//! ```
//!
//! ## Column routing
//!
//! - `name`, `hostname`, `port`, `username`, `password`, `platform` are
//!   identity fields (`name` is required).
//! - Columns starting with a configured overlay prefix (`netmiko_` by
//!   default) become typed `extras` of that connection profile.
//! - Everything else is host metadata, kept as-is.
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Raw values, rows, host records, inventory
//! - [`config`] - Load options and overlay rules
//! - [`diagnostics`] - Diagnostics returned with each load
//! - [`parser`] - Row sources (CSV, workbook / sheet grid, JSON)
//! - [`normalize`] - The normalization engine

// Core modules
pub mod error;
pub mod models;

// Configuration
pub mod config;

// Diagnostics
pub mod diagnostics;

// Row sources
pub mod parser;

// Engine
pub mod normalize;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, LoadError, NormalizeError, ReaderError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ConnectionOptions, Defaults, FieldMap, Group, Groups, HostRecord, Inventory, RawValue, Row,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{DuplicatePolicy, LoadOptions, OptionKind, OverlayRule, OverlayRules};

// =============================================================================
// Re-exports - Diagnostics
// =============================================================================

pub use diagnostics::{Diagnostic, Diagnostics, Level};

// =============================================================================
// Re-exports - Row sources
// =============================================================================

pub use parser::{
    collect_rows, DelimitedSource, InputFormat, JsonRecordsSource, RowSource, SheetSource,
};

// =============================================================================
// Re-exports - Engine
// =============================================================================

pub use normalize::{
    extract_connection_overrides, extract_identity, extract_metadata, is_empty, load, LoadReport,
    Normalizer,
};
