//! Row decomposition helpers for prefixed result columns.
//!
//! A joined row comes back with relation columns named `<prefix>__<field>`.
//! These helpers peel one prefix level at a time so a mapper can hand each
//! relation its own slice of the row, and detect absent LEFT JOIN matches.

use crate::value::FieldValue;

/// Returns the field values whose names start with `<prefix>__`, with that
/// one prefix level stripped. Deeper prefixes survive: `vt__vg__id` extracted
/// with `vt` becomes `vg__id`, ready for a second extraction.
pub fn extract_prefixed_fields(values: &[FieldValue], prefix: &str) -> Vec<FieldValue> {
    let full_prefix = format!("{prefix}__");

    values
        .iter()
        .filter_map(|fv| {
            fv.field()
                .name()
                .strip_prefix(&full_prefix)
                .map(|remainder| fv.renamed(remainder))
        })
        .collect()
}

/// Returns the field values whose names contain no `__` separator, i.e. the
/// columns belonging to the current entity rather than a nested relation.
pub fn extract_non_prefixed_fields(values: &[FieldValue]) -> Vec<FieldValue> {
    values
        .iter()
        .filter(|fv| !fv.field().name().contains("__"))
        .cloned()
        .collect()
}

/// True when every value is null or its type's zero value. An empty slice is
/// vacuously true. A LEFT JOIN with no match yields all-null relation columns,
/// which a mapper turns into an absent entity instead of a zeroed one.
pub fn all_fields_null(values: &[FieldValue]) -> bool {
    values.iter().all(FieldValue::is_zero)
}
