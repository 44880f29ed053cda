//! Connection overlays from prefixed columns.
//!
//! A column routed by an [`OverlayRules`] entry loses its prefix and becomes
//! an `extras` option of that rule's profile, coerced according to the
//! option's declared kind.

use std::collections::BTreeMap;

use super::coerce::{coerce_bool, coerce_int, CoerceError};
use super::fields::is_identity_field;
use crate::config::{OptionKind, OverlayRules};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::NormalizeResult;
use crate::models::{ConnectionOptions, FieldMap, RawValue, Row};

/// Coerce one option value by kind.
pub fn coerce_option(kind: OptionKind, value: &RawValue) -> Result<RawValue, CoerceError> {
    match kind {
        OptionKind::Integer => Ok(coerce_int(value)?.into()),
        OptionKind::Boolean => Ok(coerce_bool(value).into()),
        OptionKind::Passthrough => Ok(value.or_absent()),
    }
}

/// Build the overlay map for row `index`.
///
/// Only profiles with at least one matching column get an entry; a row with
/// no overlay columns yields an empty map.
pub fn extract_connection_overrides(
    row: &Row,
    index: usize,
    rules: &OverlayRules,
    diagnostics: &mut Diagnostics,
) -> NormalizeResult<BTreeMap<String, ConnectionOptions>> {
    let mut extras: BTreeMap<String, FieldMap> = BTreeMap::new();

    for (column, value) in row.iter() {
        if is_identity_field(column) {
            continue;
        }
        let Some((rule, option)) = rules.route(column) else {
            continue;
        };
        if option.is_empty() {
            diagnostics.push(
                Diagnostic::warning(format!("Column '{}' has no option name, ignored", column))
                    .at_row(index),
            );
            continue;
        }

        let coerced =
            coerce_option(rule.option_kind(option), value).map_err(|e| e.at(index, column))?;
        extras
            .entry(rule.profile.clone())
            .or_default()
            .insert(option, coerced);
    }

    Ok(extras
        .into_iter()
        .map(|(profile, options)| (profile, ConnectionOptions::with_extras(options)))
        .collect())
}
