//! Monetary values and the flyweight price cache.

mod cache;
mod error;
mod price;

pub use cache::{PriceCache, MAX_ENTRIES};
pub use error::InvalidPriceError;
pub use price::Price;
