//! Resting interest: orders, quote sides and their observable snapshots.

use super::error::BookError;
use crate::pricing::Price;
use crate::utils::next_tradable_tick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest volume rejected as too large. Valid original volumes are
/// `1..MAX_VOLUME`.
pub const MAX_VOLUME: u32 = 10_000;

/// The side of the book a tradable rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bid side, best price is the highest
    Buy,
    /// Offer side, best price is the lowest
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Discriminates the two flavors of resting interest.
///
/// The difference is shallow: it affects the textual representation and
/// whether the remove-quotes-for-user sweep considers the tradable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradableKind {
    /// A one-sided day order
    Order,
    /// One side of a two-sided quote
    QuoteSide,
}

/// Validates a 3-letter user code and returns it uppercased.
pub(crate) fn validate_user(user: &str) -> Result<String, BookError> {
    if user.len() == 3 && user.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(user.to_ascii_uppercase())
    } else {
        Err(BookError::DataValidation(format!(
            "user code must be exactly 3 letters: '{user}'"
        )))
    }
}

/// Validates a product symbol: 1-5 alphanumerics, or 1-4 alphanumerics, one
/// `.`, and one trailing alphanumeric.
pub(crate) fn validate_product(product: &str) -> Result<(), BookError> {
    let valid = match product.find('.') {
        None => {
            (1..=5).contains(&product.len())
                && product.bytes().all(|b| b.is_ascii_alphanumeric())
        }
        Some(dot) => {
            let head = &product[..dot];
            let tail = &product[dot + 1..];
            (1..=4).contains(&head.len())
                && head.bytes().all(|b| b.is_ascii_alphanumeric())
                && tail.len() == 1
                && tail.bytes().all(|b| b.is_ascii_alphanumeric())
        }
    };
    if valid {
        Ok(())
    } else {
        Err(BookError::DataValidation(format!(
            "product symbol must be 1-5 letters/numbers, optionally with one '.': '{product}'"
        )))
    }
}

/// A piece of resting interest: a one-sided order or one side of a quote.
///
/// Volume accounting maintains `original == remaining + cancelled + filled`
/// across every public operation; `original` is fixed at construction.
#[derive(Debug)]
pub struct Tradable {
    user: String,
    product: String,
    price: Price,
    side: Side,
    kind: TradableKind,
    original_volume: u32,
    remaining_volume: u32,
    cancelled_volume: u32,
    filled_volume: u32,
    id: String,
}

impl Tradable {
    /// Create a one-sided day order.
    pub fn order(
        user: &str,
        product: &str,
        price: Price,
        volume: u32,
        side: Side,
    ) -> Result<Self, BookError> {
        Self::new(TradableKind::Order, user, product, price, volume, side)
    }

    /// Create one side of a two-sided quote.
    pub fn quote_side(
        user: &str,
        product: &str,
        price: Price,
        volume: u32,
        side: Side,
    ) -> Result<Self, BookError> {
        Self::new(TradableKind::QuoteSide, user, product, price, volume, side)
    }

    fn new(
        kind: TradableKind,
        user: &str,
        product: &str,
        price: Price,
        volume: u32,
        side: Side,
    ) -> Result<Self, BookError> {
        let user = validate_user(user)?;
        validate_product(product)?;
        if volume == 0 || volume >= MAX_VOLUME {
            return Err(BookError::IllegalArgument(format!(
                "original volume must be > 0 and < {MAX_VOLUME}: {volume}"
            )));
        }

        let id = format!("{user}{product}{price}{}", next_tradable_tick());
        Ok(Self {
            user,
            product: product.to_string(),
            price,
            side,
            kind,
            original_volume: volume,
            remaining_volume: volume,
            cancelled_volume: 0,
            filled_volume: 0,
            id,
        })
    }

    /// The uppercased 3-letter owner code.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The product symbol this tradable was created for.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// The limit price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Which side of the book this tradable rests on.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Order or quote side.
    #[must_use]
    pub fn kind(&self) -> TradableKind {
        self.kind
    }

    /// The volume specified at construction. Never changes.
    #[must_use]
    pub fn original_volume(&self) -> u32 {
        self.original_volume
    }

    /// Volume not yet filled or cancelled.
    #[must_use]
    pub fn remaining_volume(&self) -> u32 {
        self.remaining_volume
    }

    /// Total volume cancelled so far.
    #[must_use]
    pub fn cancelled_volume(&self) -> u32 {
        self.cancelled_volume
    }

    /// Total volume filled through trading so far.
    #[must_use]
    pub fn filled_volume(&self) -> u32 {
        self.filled_volume
    }

    /// The process-unique tradable id: user, product, price string and a
    /// monotonic tick.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Moves `quantity` from remaining to filled. Callers guarantee
    /// `quantity <= remaining_volume`.
    pub(crate) fn fill(&mut self, quantity: u32) {
        debug_assert!(quantity <= self.remaining_volume);
        self.filled_volume += quantity;
        self.remaining_volume -= quantity;
    }

    /// Moves all remaining volume to cancelled.
    pub(crate) fn cancel_remaining(&mut self) {
        self.cancelled_volume += self.remaining_volume;
        self.remaining_volume = 0;
    }

    /// An immutable copy of this tradable's observable state.
    #[must_use]
    pub fn snapshot(&self) -> TradableSnapshot {
        TradableSnapshot {
            user: self.user.clone(),
            product: self.product.clone(),
            price: self.price,
            original_volume: self.original_volume,
            remaining_volume: self.remaining_volume,
            cancelled_volume: self.cancelled_volume,
            filled_volume: self.filled_volume,
            side: self.side,
            id: self.id.clone(),
        }
    }
}

impl fmt::Display for Tradable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TradableKind::Order => write!(
                f,
                "{} {} order: {} at {}, Orig Vol: {}, Rem Vol: {}, Fill Vol: {}, CXL Vol: {}, ID: {}",
                self.user,
                self.side,
                self.product,
                self.price,
                self.original_volume,
                self.remaining_volume,
                self.filled_volume,
                self.cancelled_volume,
                self.id
            ),
            TradableKind::QuoteSide => write!(
                f,
                "{} {} side quote for {}: {}, Orig Vol: {}, Rem Vol: {}, Fill Vol: {}, CXL Vol: {}, ID: {}",
                self.user,
                self.side,
                self.product,
                self.price,
                self.original_volume,
                self.remaining_volume,
                self.filled_volume,
                self.cancelled_volume,
                self.id
            ),
        }
    }
}

/// An immutable copy of a [`Tradable`]'s observable fields, used for
/// external notification and for the per-user ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradableSnapshot {
    /// Owner user code
    pub user: String,
    /// Product symbol
    pub product: String,
    /// Limit price
    pub price: Price,
    /// Volume at construction
    pub original_volume: u32,
    /// Volume not yet filled or cancelled
    pub remaining_volume: u32,
    /// Volume cancelled so far
    pub cancelled_volume: u32,
    /// Volume filled so far
    pub filled_volume: u32,
    /// Side of the book
    pub side: Side,
    /// The tradable id this snapshot was taken from
    pub id: String,
}

impl fmt::Display for TradableSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product: {}, Price: {}, OriginalVolume: {}, RemainingVolume: {}, CancelledVolume: {}, FilledVolume: {}, User: {}, Side: {}, Id: {}",
            self.product,
            self.price,
            self.original_volume,
            self.remaining_volume,
            self.cancelled_volume,
            self.filled_volume,
            self.user,
            self.side,
            self.id
        )
    }
}

/// A two-sided quote: one BUY and one SELL quote side for the same user and
/// product.
///
/// The quote itself never rests in a book; its two sides do. At most one
/// quote side per user may rest on each side of a product book, which the
/// book enforces by removing a user's existing quote sides before adding a
/// new quote.
#[derive(Debug)]
pub struct Quote {
    user: String,
    product: String,
    buy_side: Tradable,
    sell_side: Tradable,
}

impl Quote {
    /// Create a quote from its buy and sell prices and volumes. Both volumes
    /// must lie in `1..MAX_VOLUME`.
    pub fn new(
        product: &str,
        buy_price: Price,
        buy_volume: u32,
        sell_price: Price,
        sell_volume: u32,
        user: &str,
    ) -> Result<Self, BookError> {
        let buy_side = Tradable::quote_side(user, product, buy_price, buy_volume, Side::Buy)?;
        let sell_side = Tradable::quote_side(user, product, sell_price, sell_volume, Side::Sell)?;
        Ok(Self {
            user: buy_side.user().to_string(),
            product: product.to_string(),
            buy_side,
            sell_side,
        })
    }

    /// The uppercased owner code.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The product symbol.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Borrow the requested quote side.
    #[must_use]
    pub fn side(&self, side: Side) -> &Tradable {
        match side {
            Side::Buy => &self.buy_side,
            Side::Sell => &self.sell_side,
        }
    }

    /// Consume the quote, yielding `(buy, sell)` for booking.
    pub(crate) fn into_sides(self) -> (Tradable, Tradable) {
        (self.buy_side, self.sell_side)
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote for {} from {}:\n   BUY  --> {}\n   SELL --> {}",
            self.product, self.user, self.buy_side, self.sell_side
        )
    }
}
