//! OpenSASE Storefront - Product Variant Selection
//!
//! The product detail page sells a family of variants (color × storage × RAM)
//! where not every combination exists. This crate resolves a shopper's
//! partial selection against that sparse family and keeps the page data,
//! the selection, and the address bar in step.
//!
//! ## Features
//! - Validated variant matrix per product family
//! - Pure resolver: available values, variant resolution, selection repair
//! - Navigation-sync controller with silent reloads and echo suppression
//! - HTTP and in-memory catalog backends

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod domain;
pub mod fixtures;
pub mod navigation;

pub use domain::{Money, Quantity, SelectionState, VariantId, VariantMatrix, VariantRow};

// =============================================================================
// Core Types
// =============================================================================

/// Full data of the variant currently on display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDetail {
    pub id: VariantId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub stock: Quantity,
    #[serde(default)]
    pub images: Vec<String>,
}

impl VariantDetail {
    pub fn is_in_stock(&self) -> bool { !self.stock.is_zero() }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Informational property lists shown next to the selector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantProperties {
    #[serde(default)]
    pub selectable: Vec<Property>,
    #[serde(default)]
    pub required: Vec<Property>,
    #[serde(default)]
    pub info: Vec<Property>,
}

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Variant {variant_id} not found")]
    NotFound { variant_id: VariantId },

    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Malformed catalog data for {variant_id}: {reason}")]
    Malformed { variant_id: VariantId, reason: String },
}

/// How the page presents a failed load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageErrorKind {
    /// "Product not found"
    NotFound,
    /// Transient; shown as a banner with a retry affordance.
    Retryable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorScope {
    /// Family load failed; the variant area cannot render.
    Family,
    /// Detail reload failed; the previous variant stays on display.
    Variant,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub struct PageError {
    pub kind: PageErrorKind,
    pub scope: ErrorScope,
    pub message: String,
}

impl PageError {
    pub fn from_load(error: &LoadError, scope: ErrorScope) -> Self {
        let (kind, message) = match error {
            LoadError::NotFound { .. } => (PageErrorKind::NotFound, "Product not found".to_string()),
            LoadError::Network { .. } | LoadError::Malformed { .. } => {
                (PageErrorKind::Retryable, "Could not load this product. Please try again.".to_string())
            }
        };
        Self { kind, scope, message }
    }

    pub fn blocks_variant_area(&self) -> bool { self.scope == ErrorScope::Family }
}

pub type Result<T> = std::result::Result<T, LoadError>;
