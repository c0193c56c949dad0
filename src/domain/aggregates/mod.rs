//! Aggregates module
pub mod variant_matrix;
pub mod selection;

pub use variant_matrix::{MatrixError, VariantMatrix, VariantRow};
pub use selection::SelectionState;
