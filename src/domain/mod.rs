//! Product page domain: variant family, selection, and the pure resolver
pub mod aggregates;
pub mod events;
pub mod resolver;
pub mod value_objects;

pub use aggregates::{MatrixError, SelectionState, VariantMatrix, VariantRow};
pub use events::PageEvent;
pub use value_objects::{Money, Quantity, VariantId};
