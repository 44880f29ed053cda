//! Normalized inventory types handed to the orchestration layer.

use serde::Serialize;
use std::collections::BTreeMap;

use super::value::FieldMap;

// =============================================================================
// Connection Options
// =============================================================================

/// Per-profile connection settings layered over a host's identity fields.
///
/// Overlays built from table columns only ever populate `extras`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConnectionOptions {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub platform: Option<String>,
    pub extras: Option<FieldMap>,
}

impl ConnectionOptions {
    /// An overlay carrying only extra options.
    pub fn with_extras(extras: FieldMap) -> Self {
        Self {
            extras: Some(extras),
            ..Self::default()
        }
    }
}

// =============================================================================
// Host Record
// =============================================================================

/// One manageable device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostRecord {
    /// Unique, non-empty inventory key.
    pub name: String,
    /// Network address; when absent, connect to `name`.
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub platform: Option<String>,
    /// Every column that is neither an identity field nor an overlay option.
    pub metadata: FieldMap,
    /// Overlays keyed by connection profile name.
    pub connection_overrides: BTreeMap<String, ConnectionOptions>,
}

impl HostRecord {
    /// Address to connect to: `hostname`, falling back to `name`.
    pub fn address(&self) -> &str {
        self.hostname.as_deref().unwrap_or(&self.name)
    }

    /// Overlay extras for a profile, if the table set any.
    pub fn extras(&self, profile: &str) -> Option<&FieldMap> {
        self.connection_overrides
            .get(profile)
            .and_then(|c| c.extras.as_ref())
    }

    /// Connection settings for a profile: overlay fields win over the
    /// host's own identity fields.
    pub fn resolve_connection(&self, profile: &str) -> ConnectionOptions {
        let overlay = self.connection_overrides.get(profile);
        let pick = |o: Option<&Option<String>>, base: &Option<String>| {
            o.and_then(|v| v.clone()).or_else(|| base.clone())
        };

        ConnectionOptions {
            hostname: pick(overlay.map(|o| &o.hostname), &self.hostname)
                .or_else(|| Some(self.name.clone())),
            port: overlay.and_then(|o| o.port).or(self.port),
            username: pick(overlay.map(|o| &o.username), &self.username),
            password: pick(overlay.map(|o| &o.password), &self.password),
            platform: pick(overlay.map(|o| &o.platform), &self.platform),
            extras: overlay.and_then(|o| o.extras.clone()),
        }
    }
}

// =============================================================================
// Groups & Defaults
// =============================================================================

/// A host group. Groups are never derived from tables, so the inventory's
/// group collection is always empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Group {
    pub name: String,
    pub metadata: FieldMap,
}

/// Group collection keyed by name.
pub type Groups = BTreeMap<String, Group>;

/// Inventory-wide default values (always empty for table inventories).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Defaults {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub platform: Option<String>,
    pub metadata: FieldMap,
    pub connection_overrides: BTreeMap<String, ConnectionOptions>,
}

// =============================================================================
// Inventory
// =============================================================================

/// Hosts keyed by name plus (empty) groups and defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Inventory {
    pub hosts: BTreeMap<String, HostRecord>,
    pub groups: Groups,
    pub defaults: Defaults,
}

impl Inventory {
    /// Package hosts with empty groups and defaults.
    pub fn from_hosts(hosts: BTreeMap<String, HostRecord>) -> Self {
        Self {
            hosts,
            groups: Groups::new(),
            defaults: Defaults::default(),
        }
    }

    pub fn host(&self, name: &str) -> Option<&HostRecord> {
        self.hosts.get(name)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
