//! Load options: port policy, duplicate policy and overlay rules.
//!
//! Overlay rules declare which column prefixes feed which connection profile.
//! They are validated once, when a [`crate::normalize::Normalizer`] is built,
//! instead of being discovered column by column.
//!
//! # Example
//!
//! ```json
//! {
//!   "default_port": null,
//!   "duplicates": "overwrite",
//!   "overlays": [
//!     {
//!       "prefix": "netmiko_",
//!       "profile": "netmiko",
//!       "integer_options": ["timeout", "conn_timeout"],
//!       "boolean_options": ["fast_cli"]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Column prefix routed to the netmiko profile by default.
pub const NETMIKO_PREFIX: &str = "netmiko_";

/// Connection profile name used by the default overlay rule.
pub const NETMIKO_PROFILE: &str = "netmiko";

/// Netmiko timeout-family options, coerced to integers.
pub const NETMIKO_INTEGER_OPTIONS: [&str; 6] = [
    "timeout",
    "conn_timeout",
    "auth_timeout",
    "banner_timeout",
    "blocking_timeout",
    "session_timeout",
];

/// Netmiko switches, coerced to booleans.
pub const NETMIKO_BOOLEAN_OPTIONS: [&str; 1] = ["fast_cli"];

/// Environment variable naming a JSON options file for the CLI.
pub const CONFIG_ENV_VAR: &str = "TABLE_INVENTORY_CONFIG";

// =============================================================================
// Policies
// =============================================================================

/// What to do when two rows share a host name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later row replaces the earlier one.
    #[default]
    Overwrite,
    /// Abort the load.
    Reject,
}

/// How an overlay option's value is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Integer,
    Boolean,
    /// Stored as-is (empty becomes absent).
    Passthrough,
}

// =============================================================================
// Overlay Rules
// =============================================================================

/// Routes columns starting with `prefix` into the `profile` overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRule {
    pub prefix: String,
    pub profile: String,
    #[serde(default)]
    pub integer_options: Vec<String>,
    #[serde(default)]
    pub boolean_options: Vec<String>,
}

impl OverlayRule {
    /// The built-in `netmiko_*` rule.
    pub fn netmiko() -> Self {
        Self {
            prefix: NETMIKO_PREFIX.to_string(),
            profile: NETMIKO_PROFILE.to_string(),
            integer_options: NETMIKO_INTEGER_OPTIONS.iter().map(|s| s.to_string()).collect(),
            boolean_options: NETMIKO_BOOLEAN_OPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn option_kind(&self, option: &str) -> OptionKind {
        if self.integer_options.iter().any(|o| o == option) {
            OptionKind::Integer
        } else if self.boolean_options.iter().any(|o| o == option) {
            OptionKind::Boolean
        } else {
            OptionKind::Passthrough
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix(self.profile.clone()));
        }
        if self.profile.is_empty() {
            return Err(ConfigError::EmptyProfile(self.prefix.clone()));
        }
        if let Some(option) = self
            .integer_options
            .iter()
            .find(|o| self.boolean_options.contains(o))
        {
            return Err(ConfigError::ConflictingOption {
                profile: self.profile.clone(),
                option: option.clone(),
            });
        }
        Ok(())
    }
}

/// A validated set of overlay rules.
///
/// No prefix is a prefix of another, so every column matches at most one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRules {
    rules: Vec<OverlayRule>,
}

impl OverlayRules {
    pub fn new(rules: Vec<OverlayRule>) -> ConfigResult<Self> {
        for (i, rule) in rules.iter().enumerate() {
            rule.validate()?;
            for other in &rules[..i] {
                if other.profile == rule.profile {
                    return Err(ConfigError::DuplicateProfile(rule.profile.clone()));
                }
                if other.prefix.starts_with(&rule.prefix)
                    || rule.prefix.starts_with(&other.prefix)
                {
                    return Err(ConfigError::OverlappingPrefixes(
                        other.prefix.clone(),
                        rule.prefix.clone(),
                    ));
                }
            }
        }
        Ok(Self { rules })
    }

    /// Just the built-in netmiko rule.
    pub fn netmiko() -> Self {
        Self {
            rules: vec![OverlayRule::netmiko()],
        }
    }

    /// Find the rule owning `column` and return it with the option name
    /// left after stripping the prefix.
    pub fn route<'c>(&self, column: &'c str) -> Option<(&OverlayRule, &'c str)> {
        self.rules
            .iter()
            .find_map(|r| column.strip_prefix(r.prefix.as_str()).map(|opt| (r, opt)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Load Options
// =============================================================================

/// Options for a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Port used when the `port` column is empty (`None` keeps it absent).
    pub default_port: Option<u16>,

    /// Duplicate host name handling.
    pub duplicates: DuplicatePolicy,

    /// Column prefix to connection profile routing.
    pub overlays: Vec<OverlayRule>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_port: None,
            duplicates: DuplicatePolicy::Overwrite,
            overlays: vec![OverlayRule::netmiko()],
        }
    }
}

impl LoadOptions {
    /// Parse options from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the overlay rules.
    pub fn overlay_rules(&self) -> ConfigResult<OverlayRules> {
        OverlayRules::new(self.overlays.clone())
    }
}
