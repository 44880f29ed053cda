//! Identity fields and free-form metadata.

use super::coerce::{coerce_port, coerce_string};
use crate::config::OverlayRules;
use crate::error::{NormalizeError, NormalizeResult};
use crate::models::{FieldMap, Row};

/// Columns that map onto host identity fields.
pub const IDENTITY_FIELDS: [&str; 6] =
    ["name", "hostname", "port", "username", "password", "platform"];

pub fn is_identity_field(column: &str) -> bool {
    IDENTITY_FIELDS.contains(&column)
}

/// Typed identity fields of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub platform: Option<String>,
}

/// Extract identity fields from row `index`.
///
/// An empty `name` is fatal. An empty `port` becomes `default_port`.
pub fn extract_identity(
    row: &Row,
    index: usize,
    default_port: Option<u16>,
) -> NormalizeResult<Identity> {
    let name = coerce_string(row.value("name")).ok_or_else(|| NormalizeError::EmptyName {
        row: index,
        payload: row.to_string(),
    })?;

    let port = coerce_port(row.value("port"))
        .map_err(|e| e.at(index, "port"))?
        .or(default_port);

    Ok(Identity {
        name,
        hostname: coerce_string(row.value("hostname")),
        port,
        username: coerce_string(row.value("username")),
        password: coerce_string(row.value("password")),
        platform: coerce_string(row.value("platform")),
    })
}

/// Every column that is neither an identity field nor routed to an overlay.
///
/// Values are kept as-is except that empty ones become absent. Column order
/// follows the row.
pub fn extract_metadata(row: &Row, rules: &OverlayRules) -> FieldMap {
    row.iter()
        .filter(|(column, _)| !is_identity_field(column) && rules.route(column).is_none())
        .map(|(column, value)| (column, value.or_absent()))
        .collect()
}
