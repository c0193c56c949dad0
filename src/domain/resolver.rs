//! Selection Resolver
//!
//! Pure functions over a [`VariantMatrix`] and a [`SelectionState`]. None of
//! them fail: absence is an empty set or `None`.

use indexmap::IndexSet;
use crate::domain::aggregates::{SelectionState, VariantMatrix};
use crate::domain::value_objects::VariantId;

/// Values of `property` still reachable under the other selected properties.
///
/// The property's own current value is ignored. Values come back in the
/// order they first appear in the matrix.
pub fn available_values<'m>(property: &str, selection: &SelectionState, matrix: &'m VariantMatrix) -> IndexSet<&'m str> {
    let others = selection.without(property);
    matrix.rows().iter()
        .filter(|row| others.matches(row))
        .filter_map(|row| row.value(property))
        .collect()
}

/// The variant whose values equal the selection on every selectable name.
///
/// Incomplete selections never resolve. Duplicate rows resolve to the first
/// one in matrix order.
pub fn resolve_variant_id<'m>(selection: &SelectionState, selectable_names: &[String], matrix: &'m VariantMatrix) -> Option<&'m VariantId> {
    if !selection.is_complete(selectable_names) { return None; }
    matrix.rows().iter()
        .find(|row| selectable_names.iter().all(|n| row.value(n) == selection.get(n)))
        .map(|row| &row.variant_id)
}

/// Applies a user change and drops other values it made unreachable.
///
/// A single pass in `selectable_names` order; each check already sees the
/// values dropped before it.
pub fn repair_selection(
    changed_property: &str,
    new_value: &str,
    selection: &SelectionState,
    selectable_names: &[String],
    matrix: &VariantMatrix,
) -> SelectionState {
    let mut repaired = selection.clone();
    repaired.set(changed_property, new_value);
    for name in selectable_names.iter().filter(|n| n.as_str() != changed_property) {
        let Some(current) = repaired.get(name).map(str::to_owned) else { continue };
        if !available_values(name, &repaired, matrix).contains(current.as_str()) {
            repaired.clear(name);
        }
    }
    repaired
}
