//! Domain models for the table-to-inventory pipeline.
//!
//! - [`RawValue`] - One cell as produced by a row source
//! - [`Row`] / [`FieldMap`] - Ordered column maps
//! - [`HostRecord`] - A normalized, connectable host
//! - [`ConnectionOptions`] - Per-profile connection overlay
//! - [`Inventory`] - Hosts plus (empty) groups and defaults

pub mod inventory;
pub mod value;

pub use inventory::{ConnectionOptions, Defaults, Group, Groups, HostRecord, Inventory};
pub use value::{FieldMap, RawValue, Row};
