//! Normalization engine: rows in, inventory out.
//!
//! ```text
//! Row ─┬─▶ extract_identity ───────────────┐
//!      ├─▶ extract_metadata ───────────────┼─▶ HostRecord ─▶ Inventory (by name)
//!      └─▶ extract_connection_overrides ───┘
//! ```
//!
//! Rows are processed strictly in order. The first fatal condition (empty
//! name, failed integer coercion, rejected duplicate) aborts the load and no
//! inventory is returned.

pub mod coerce;
pub mod fields;
pub mod overlay;

use std::collections::BTreeMap;

use crate::config::{DuplicatePolicy, LoadOptions, OverlayRules};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ConfigResult, LoadResult, NormalizeError, NormalizeResult};
use crate::models::{HostRecord, Inventory, Row};
use crate::parser::RowSource;

pub use coerce::{coerce_bool, coerce_int, coerce_port, coerce_string, is_empty, CoerceError};
pub use fields::{extract_identity, extract_metadata, is_identity_field, Identity, IDENTITY_FIELDS};
pub use overlay::{coerce_option, extract_connection_overrides};

/// Inventory plus the diagnostics gathered while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub inventory: Inventory,
    pub diagnostics: Diagnostics,
}

/// Turns rows into host records under a fixed set of options.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    default_port: Option<u16>,
    duplicates: DuplicatePolicy,
    rules: OverlayRules,
}

impl Default for Normalizer {
    /// Same as [`LoadOptions::default`]; the built-in rule needs no validation.
    fn default() -> Self {
        Self::with_rules(&LoadOptions::default(), OverlayRules::netmiko())
    }
}

impl Normalizer {
    /// Validate `options` and build a normalizer.
    pub fn new(options: LoadOptions) -> ConfigResult<Self> {
        let rules = options.overlay_rules()?;
        Ok(Self::with_rules(&options, rules))
    }

    fn with_rules(options: &LoadOptions, rules: OverlayRules) -> Self {
        Self {
            default_port: options.default_port,
            duplicates: options.duplicates,
            rules,
        }
    }

    pub fn rules(&self) -> &OverlayRules {
        &self.rules
    }

    /// Build the host record for row `index`.
    pub fn host_record(
        &self,
        row: &Row,
        index: usize,
        diagnostics: &mut Diagnostics,
    ) -> NormalizeResult<HostRecord> {
        let identity = extract_identity(row, index, self.default_port)?;
        let metadata = extract_metadata(row, &self.rules);
        let connection_overrides =
            extract_connection_overrides(row, index, &self.rules, diagnostics)?;

        Ok(HostRecord {
            name: identity.name,
            hostname: identity.hostname,
            port: identity.port,
            username: identity.username,
            password: identity.password,
            platform: identity.platform,
            metadata,
            connection_overrides,
        })
    }

    /// Normalize every row, in order, into an inventory.
    pub fn load<I>(&self, rows: I) -> NormalizeResult<LoadReport>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut diagnostics = Diagnostics::new();
        let mut hosts: BTreeMap<String, HostRecord> = BTreeMap::new();
        let mut row_count = 0;

        for (index, row) in rows.into_iter().enumerate() {
            row_count += 1;
            let host = match self.host_record(&row, index, &mut diagnostics) {
                Ok(host) => host,
                Err(e) => {
                    // Log only; the payload travels in the error.
                    if let NormalizeError::EmptyName { payload, .. } = &e {
                        log::error!("Host name is empty for data: {}", payload);
                    }
                    return Err(e);
                }
            };

            if hosts.contains_key(&host.name) {
                match self.duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(NormalizeError::DuplicateName {
                            row: index,
                            name: host.name,
                        });
                    }
                    DuplicatePolicy::Overwrite => diagnostics.push(
                        Diagnostic::warning(format!(
                            "Host '{}' redefined, keeping the later row",
                            host.name
                        ))
                        .at_row(index),
                    ),
                }
            }
            hosts.insert(host.name.clone(), host);
        }

        diagnostics.success(format!("Built {} hosts from {} rows", hosts.len(), row_count));

        Ok(LoadReport {
            inventory: Inventory::from_hosts(hosts),
            diagnostics,
        })
    }

    /// Read a source and normalize it.
    ///
    /// The source is consumed lazily; the first reader or normalization
    /// failure ends the load.
    pub fn load_source<S: RowSource>(&self, source: S) -> LoadResult<LoadReport> {
        let mut reader_error = None;
        let rows = source.into_rows()?.map_while(|r| match r {
            Ok(row) => Some(row),
            Err(e) => {
                reader_error = Some(e);
                None
            }
        });

        let report = self.load(rows)?;
        match reader_error {
            Some(e) => Err(e.into()),
            None => Ok(report),
        }
    }
}

/// Normalize rows with the default options.
pub fn load<I>(rows: I) -> NormalizeResult<LoadReport>
where
    I: IntoIterator<Item = Row>,
{
    Normalizer::default().load(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayRule;
    use crate::diagnostics::Level;
    use crate::error::{LoadError, ReaderError};
    use crate::models::RawValue;
    use crate::parser::{DelimitedSource, JsonRecordsSource};

    fn row(cells: &[(&str, RawValue)]) -> Row {
        cells.iter().cloned().collect()
    }

    #[test]
    fn test_identity_record() {
        let rows = vec![row(&[
            ("name", "R1".into()),
            ("hostname", "10.0.0.1".into()),
            ("port", RawValue::Int(22)),
        ])];
        let report = load(rows).unwrap();
        let host = report.inventory.host("R1").unwrap();

        assert_eq!(host.name, "R1");
        assert_eq!(host.hostname.as_deref(), Some("10.0.0.1"));
        assert_eq!(host.port, Some(22));
        assert!(host.metadata.is_empty());
        assert!(host.connection_overrides.is_empty());
    }

    #[test]
    fn test_empty_port_is_absent() {
        let report = load(vec![row(&[("name", "R2".into()), ("port", "".into())])]).unwrap();
        assert_eq!(report.inventory.host("R2").unwrap().port, None);
    }

    #[test]
    fn test_overlay_extras() {
        let report = load(vec![row(&[
            ("name", "R3".into()),
            ("netmiko_timeout", "30".into()),
            ("netmiko_fast_cli", "false".into()),
        ])])
        .unwrap();
        let host = report.inventory.host("R3").unwrap();
        let extras = host.extras("netmiko").unwrap();

        assert_eq!(extras.value("timeout"), &RawValue::Int(30));
        assert_eq!(extras.value("fast_cli"), &RawValue::Bool(false));
        assert!(host.metadata.is_empty());
    }

    #[test]
    fn test_metadata_routing() {
        let report = load(vec![row(&[
            ("name", "R4".into()),
            ("site", "NYC".into()),
            ("owner", "".into()),
        ])])
        .unwrap();
        let host = report.inventory.host("R4").unwrap();

        assert_eq!(host.metadata.value("site"), &RawValue::from("NYC"));
        assert_eq!(host.metadata.get("owner"), Some(&RawValue::Absent));
        assert!(host.connection_overrides.is_empty());
        assert_eq!(host.hostname, None);
    }

    #[test]
    fn test_empty_name_aborts_whole_load() {
        let rows = vec![
            row(&[("name", "R1".into())]),
            row(&[("name", "".into()), ("site", "LAX".into())]),
            row(&[("name", "R3".into())]),
        ];
        let err = load(rows).unwrap_err();
        match err {
            NormalizeError::EmptyName { row, payload } => {
                assert_eq!(row, 1);
                assert!(payload.contains("LAX"));
            }
            other => panic!("expected EmptyName, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_name_error_carries_payload() {
        let rows = vec![row(&[("name", RawValue::Absent), ("site", "LAX".into())])];
        let err = Normalizer::default().load(rows).unwrap_err();
        assert!(err.to_string().contains("LAX"));
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn test_default_matches_default_options() {
        let from_options = Normalizer::new(LoadOptions::default()).unwrap();
        assert_eq!(Normalizer::default(), from_options);
        assert_eq!(Normalizer::default().rules(), &OverlayRules::netmiko());
    }

    #[test]
    fn test_bad_timeout_aborts_load() {
        let rows = vec![row(&[("name", "R1".into()), ("netmiko_timeout", "abc".into())])];
        assert!(matches!(load(rows), Err(NormalizeError::Coercion { .. })));
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let rows = vec![
            row(&[("name", "R1".into()), ("site", "NYC".into())]),
            row(&[("name", "R2".into())]),
            row(&[("name", "R1".into()), ("site", "LAX".into())]),
        ];
        let report = load(rows.clone()).unwrap();

        assert_eq!(report.inventory.len(), 2);
        let expected = Normalizer::default()
            .host_record(&rows[2], 2, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(report.inventory.host("R1"), Some(&expected));

        let warning = report.diagnostics.with_level(Level::Warning).next().unwrap();
        assert_eq!(warning.row, Some(2));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let options = LoadOptions {
            duplicates: DuplicatePolicy::Reject,
            ..LoadOptions::default()
        };
        let rows = vec![row(&[("name", "R1".into())]), row(&[("name", "R1".into())])];
        let err = Normalizer::new(options).unwrap().load(rows).unwrap_err();
        assert!(matches!(err, NormalizeError::DuplicateName { row: 1, .. }));
    }

    #[test]
    fn test_default_port_option() {
        let options = LoadOptions {
            default_port: Some(22),
            ..LoadOptions::default()
        };
        let rows = vec![
            row(&[("name", "R1".into())]),
            row(&[("name", "R2".into()), ("port", "830".into())]),
        ];
        let report = Normalizer::new(options).unwrap().load(rows).unwrap();
        assert_eq!(report.inventory.host("R1").unwrap().port, Some(22));
        assert_eq!(report.inventory.host("R2").unwrap().port, Some(830));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let options = LoadOptions {
            overlays: vec![OverlayRule::netmiko(), OverlayRule::netmiko()],
            ..LoadOptions::default()
        };
        assert!(Normalizer::new(options).is_err());
    }

    #[test]
    fn test_groups_and_defaults_empty() {
        let report = load(vec![row(&[("name", "R1".into())])]).unwrap();
        assert!(report.inventory.groups.is_empty());
        assert_eq!(report.inventory.defaults, Default::default());
    }

    #[test]
    fn test_idempotent() {
        let csv = "name,hostname,port,site,netmiko_timeout,netmiko_fast_cli\n\
                   R1,10.0.0.1,22,NYC,30,false\n\
                   R2,,,,,\n";
        let rows = crate::parser::collect_rows(DelimitedSource::from_text(csv)).unwrap();

        let normalizer = Normalizer::default();
        let first = normalizer.load(rows.clone()).unwrap();
        let second = normalizer.load(rows).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.inventory.to_json().unwrap(),
            second.inventory.to_json().unwrap()
        );
    }

    #[test]
    fn test_load_source_csv() {
        let csv = "name,hostname,port,username,password,platform,site,netmiko_timeout\n\
                   R1,10.0.0.1,22,admin,secret,cisco_ios,NYC,30\n";
        let report = Normalizer::default()
            .load_source(DelimitedSource::from_text(csv))
            .unwrap();
        let host = report.inventory.host("R1").unwrap();

        assert_eq!(host.username.as_deref(), Some("admin"));
        assert_eq!(host.password.as_deref(), Some("secret"));
        assert_eq!(host.platform.as_deref(), Some("cisco_ios"));
        assert_eq!(host.metadata.value("site"), &RawValue::from("NYC"));
        assert_eq!(host.extras("netmiko").unwrap().value("timeout"), &RawValue::Int(30));
    }

    #[test]
    fn test_load_source_reader_error() {
        let source = JsonRecordsSource::from_text(r#"[{"name": "R1"}, "oops"]"#).unwrap();
        let err = Normalizer::default().load_source(source).unwrap_err();
        assert!(matches!(err, LoadError::Reader(ReaderError::Json(_))));
    }

    #[test]
    fn test_load_source_normalize_error() {
        let err = Normalizer::default()
            .load_source(DelimitedSource::from_text("name,port\nR1,ssh\n"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Normalize(NormalizeError::Coercion { .. })));
    }
}
