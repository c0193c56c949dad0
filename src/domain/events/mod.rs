//! Page events raised by the navigation controller for its host
use crate::domain::value_objects::VariantId;
use crate::PageError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    /// Rewrite the address bar with a history replace, keeping scroll position.
    UrlReplaced { variant_id: VariantId, path: String },
    FamilyLoaded { variant_id: VariantId, variant_count: usize },
    VariantDisplayed { variant_id: VariantId },
    LoadFailed { variant_id: VariantId, error: PageError },
}

impl PageEvent {
    pub fn url_replaced(variant_id: &VariantId) -> Self {
        Self::UrlReplaced { variant_id: variant_id.clone(), path: variant_id.product_path() }
    }
}
