//! Value Objects for the storefront product page

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const PRODUCT_PATH_PREFIX: &str = "/products/";

/// Opaque identifier of one purchasable variant
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }
    pub fn as_str(&self) -> &str { &self.0 }

    /// Path of the product page showing this variant.
    pub fn product_path(&self) -> String { format!("{PRODUCT_PATH_PREFIX}{}", self.0) }

    /// Reads the variant id segment back out of a product page path.
    pub fn from_product_path(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(PRODUCT_PATH_PREFIX)?;
        let segment = rest.split(['/', '?', '#']).next()?.trim();
        if segment.is_empty() { return None; }
        Some(Self(segment.to_string()))
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for VariantId {
    fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for VariantId {
    fn from(value: String) -> Self { Self(value) }
}

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn usd(amount: Decimal) -> Self { Self::new(amount, "USD") }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {}", self.amount, self.currency) }
}

/// Stock on hand as reported by the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
}
