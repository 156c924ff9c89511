/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/10/25
******************************************************************************/

//! Prelude module that re-exports commonly used types and traits.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the tradebook-rs crate. Instead of importing each type
//! individually, you can use:
//!
//! ```rust
//! use tradebook_rs::prelude::*;
//! ```
//!
//! This will import all the essential types needed for working with the
//! trade book.

// The engine context
pub use crate::engine::TradeBook;

// Core book types
pub use crate::book::{
    BookError, ProductBook, ProductBookSide, ProductRegistry, Quote, Side, Tradable,
    TradableKind, TradableSnapshot, MAX_VOLUME,
};

// Pricing types
pub use crate::pricing::{InvalidPriceError, Price, PriceCache, MAX_ENTRIES};

// User-side types
pub use crate::users::{UserLedger, UserRegistry};

// Market publication types
pub use crate::market::{MarketPublisher, MarketSide, MarketTracker};

// Utility functions
pub use crate::utils::next_tradable_tick;
