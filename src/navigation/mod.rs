//! Navigation: keeping selection, page data and the address bar in step
pub mod controller;
pub mod session;

pub use controller::{LoadKind, LoadRequest, Loaded, NavigationController, Phase, SelectOutcome, Ticket};
pub use session::ProductPageSession;
