//! Selection Aggregate

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::VariantRow;

/// The shopper's current, possibly incomplete, choice of property values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState(IndexMap<String, String>);

impl SelectionState {
    pub fn new() -> Self { Self::default() }

    /// Selection describing `row`, restricted to the selectable names.
    pub fn from_row(row: &VariantRow, selectable_names: &[String]) -> Self {
        Self(selectable_names.iter()
            .filter_map(|n| row.value(n).map(|v| (n.clone(), v.to_string())))
            .collect())
    }

    pub fn get(&self, property: &str) -> Option<&str> { self.0.get(property).map(String::as_str) }
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) { self.0.insert(property.into(), value.into()); }
    pub fn clear(&mut self, property: &str) -> Option<String> { self.0.shift_remove(property) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> { self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())) }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self { self.set(property, value); self }

    /// Whether every selectable name has a chosen value.
    pub fn is_complete(&self, selectable_names: &[String]) -> bool {
        selectable_names.iter().all(|n| self.0.contains_key(n))
    }

    /// Copy without `property`, used when a property must not restrict its own options.
    pub fn without(&self, property: &str) -> Self {
        let mut copy = self.clone();
        copy.clear(property);
        copy
    }

    /// Every chosen value equals the row's value for that property.
    pub fn matches(&self, row: &VariantRow) -> bool {
        self.iter().all(|(k, v)| row.value(k) == Some(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row_keeps_selectable_order() {
        let row = VariantRow::new("V1").with_value("storage", "128GB").with_value("color", "red");
        let sel = SelectionState::from_row(&row, &["color".into(), "storage".into(), "ram".into()]);
        let pairs: Vec<_> = sel.iter().collect();
        assert_eq!(pairs, vec![("color", "red"), ("storage", "128GB")]);
        assert!(!sel.is_complete(&["color".into(), "storage".into(), "ram".into()]));
    }

    #[test]
    fn test_matches_and_without() {
        let row = VariantRow::new("V1").with_value("color", "red").with_value("size", "S");
        let sel = SelectionState::new().with("color", "red").with("size", "M");
        assert!(!sel.matches(&row));
        assert!(sel.without("size").matches(&row));
        assert!(SelectionState::new().matches(&row));
    }
}
