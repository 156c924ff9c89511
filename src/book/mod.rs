//! Product books: resting interest, per-side engines, matching and routing.

pub mod error;
pub mod product;
pub mod registry;
pub mod side;
mod tests;
pub mod tradable;

pub use error::BookError;
pub use product::ProductBook;
pub use registry::ProductRegistry;
pub use side::ProductBookSide;
pub use tradable::{Quote, Side, Tradable, TradableKind, TradableSnapshot, MAX_VOLUME};
