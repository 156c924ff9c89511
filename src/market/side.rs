//! Top-of-book data for one market side.

use crate::pricing::Price;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The top price and the total volume at that price for one side of a
/// market, as carried by current-market publications.
///
/// An absent or volume-less side publishes the null-market sentinel
/// `$0.00x0` instead of being omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSide {
    price: Price,
    volume: u32,
}

impl MarketSide {
    /// Create a market side from a top price and the volume at that price.
    #[must_use]
    pub fn new(price: Price, volume: u32) -> Self {
        Self { price, volume }
    }

    /// The null-market sentinel, `$0.00x0`.
    #[must_use]
    pub fn null_market() -> Self {
        Self {
            price: Price::ZERO,
            volume: 0,
        }
    }

    /// The top-of-book price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// The total remaining volume at the top price.
    #[must_use]
    pub fn volume(&self) -> u32 {
        self.volume
    }
}

impl fmt::Display for MarketSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.price, self.volume)
    }
}
