//! Variant Matrix Aggregate
//!
//! The sparse table of every existing combination in one product family.
//! Built once per family load and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use crate::domain::value_objects::VariantId;

/// One existing, purchasable combination of selectable property values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRow {
    pub variant_id: VariantId,
    /// Display title, when the backend ships it with the family.
    #[serde(default)]
    pub name: Option<String>,
    pub property_values: HashMap<String, String>,
}

impl VariantRow {
    pub fn new(variant_id: impl Into<VariantId>) -> Self {
        Self { variant_id: variant_id.into(), name: None, property_values: HashMap::new() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self { self.name = Some(name.into()); self }

    pub fn with_value(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.property_values.insert(property.into(), value.into());
        self
    }

    pub fn value(&self, property: &str) -> Option<&str> { self.property_values.get(property).map(String::as_str) }
}

#[derive(Clone, Debug)]
pub struct VariantMatrix {
    selectable_names: Vec<String>,
    rows: Vec<VariantRow>,
}

impl VariantMatrix {
    /// Validates and freezes a family.
    pub fn new(selectable_names: Vec<String>, rows: Vec<VariantRow>) -> Result<Self, MatrixError> {
        let mut names = HashSet::with_capacity(selectable_names.len());
        for name in &selectable_names {
            if !names.insert(name.as_str()) { return Err(MatrixError::DuplicateName(name.clone())); }
        }
        let mut ids = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !ids.insert(&row.variant_id) { return Err(MatrixError::DuplicateVariant(row.variant_id.clone())); }
            if let Some(key) = row.property_values.keys().find(|k| !names.contains(k.as_str())) {
                return Err(MatrixError::UnknownProperty { variant_id: row.variant_id.clone(), property: key.clone() });
            }
        }
        Ok(Self { selectable_names, rows })
    }

    pub fn selectable_names(&self) -> &[String] { &self.selectable_names }
    pub fn rows(&self) -> &[VariantRow] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn is_selectable(&self, property: &str) -> bool { self.selectable_names.iter().any(|n| n == property) }

    pub fn row(&self, id: &VariantId) -> Option<&VariantRow> { self.rows.iter().find(|r| &r.variant_id == id) }
    pub fn contains(&self, id: &VariantId) -> bool { self.row(id).is_some() }

    /// Whether `value` occurs for `property` in at least one row.
    pub fn has_value(&self, property: &str, value: &str) -> bool {
        self.rows.iter().any(|r| r.value(property) == Some(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    DuplicateName(String),
    DuplicateVariant(VariantId),
    UnknownProperty { variant_id: VariantId, property: String },
}

impl std::error::Error for MatrixError {}
impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName(n) => write!(f, "Selectable property {n} listed twice"),
            Self::DuplicateVariant(id) => write!(f, "Variant {id} appears twice"),
            Self::UnknownProperty { variant_id, property } => write!(f, "Variant {variant_id} defines non-selectable property {property}"),
        }
    }
}
