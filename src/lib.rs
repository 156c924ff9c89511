//! # In-Memory Limit Order Matching Engine
//!
//! A single-venue, in-memory limit order matching engine for equity-style
//! instruments, written in Rust. The engine accepts one-sided orders and
//! two-sided quotes from identified users, organizes them into per-symbol
//! order books, matches crossable liquidity, and publishes top-of-book
//! snapshots to subscribed users after every book-mutating action.
//!
//! ## Key Features
//!
//! - **Price-Time Priority with Pro-Rata Fills**: Each book side keeps an
//!   ordered map of price levels with FIFO slots. Whole levels that fit
//!   inside an incoming request are swept in FIFO order; a request smaller
//!   than a level is allocated pro-rata with ceiling rounding and
//!   later-FIFO redistribution of residuals.
//!
//! - **Cascade Matching**: The matching loop couples both sides, targets
//!   the larger of the two top volumes and re-reads the tops every round,
//!   so crossings that reappear at deeper levels keep trading until prices
//!   no longer cross.
//!
//! - **Two-Sided Quotes**: A user's quote rests as one BUY and one SELL
//!   quote side; submitting a new quote atomically replaces the previous
//!   pair on both sides of the book.
//!
//! - **Current-Market Publication**: After every add, cancel or quote
//!   operation the book publishes its post-match top of book exactly once.
//!   The tracker substitutes the `$0.00x0` null-market sentinel for absent
//!   or volume-less sides and fans the snapshot pair out to subscribers in
//!   subscription order.
//!
//! - **Per-User Ledgers**: Every volume change pushes an immutable snapshot
//!   into the owner's ledger, which preserves insertion order and records
//!   the last seen market for each subscribed product.
//!
//! - **Flyweight Price Cache**: Prices are signed integer cents with a
//!   bounded interning cache (10,000 entries, smallest-cents eviction) and
//!   a strict decimal parser.
//!
//! ## Design Goals
//!
//! 1. **Correctness**: Volume accounting (`original == remaining +
//!    cancelled + filled`), FIFO order within levels and side ordering of
//!    levels hold after every public operation.
//! 2. **Determinism**: The engine runs single-threaded; every observable
//!    transition is totally ordered by the API-call sequence and all
//!    callbacks are synchronous.
//! 3. **Isolation**: There are no globals. All state hangs off an explicit
//!    [`TradeBook`](engine::TradeBook) context, so tests build and drop
//!    whole venues freely.
//!
//! ## Example
//!
//! ```rust
//! use tradebook_rs::prelude::*;
//!
//! fn main() -> Result<(), BookError> {
//!     let mut venue = TradeBook::new();
//!     venue.init_users(&["ANN", "BOB"])?;
//!     venue.add_product("TGT")?;
//!     venue.subscribe_current_market("TGT", "BOB")?;
//!
//!     let offer = venue.parse_price("$100.00")?;
//!     venue.add_order("ANN", "TGT", offer, 50, Side::Sell)?;
//!
//!     // BOB lifts the offer; both orders fill completely.
//!     let buy = venue.add_order("BOB", "TGT", offer, 50, Side::Buy)?;
//!     let filled = venue.user("BOB")?.tradable(&buy.id).unwrap();
//!     assert_eq!(filled.filled_volume, 50);
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! The core is intentionally single-threaded. Implementations that share an
//! engine across threads must serialize all mutations of a product book
//! under a per-symbol lock, guard the price cache, and keep observer
//! callbacks from re-entering the publishing book.

pub mod book;
pub mod engine;
pub mod market;
pub mod prelude;
pub mod pricing;
pub mod users;
mod utils;

pub use book::{
    BookError, ProductBook, ProductBookSide, ProductRegistry, Quote, Side, Tradable,
    TradableKind, TradableSnapshot, MAX_VOLUME,
};
pub use engine::TradeBook;
pub use market::{MarketPublisher, MarketSide, MarketTracker};
pub use pricing::{InvalidPriceError, Price, PriceCache, MAX_ENTRIES};
pub use users::{UserLedger, UserRegistry};
pub use utils::next_tradable_tick;
