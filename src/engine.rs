/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/10/25
******************************************************************************/

//! The explicit engine context tying the registries, the market tracker and
//! the price cache together behind one outer API.

use crate::book::error::BookError;
use crate::book::registry::ProductRegistry;
use crate::book::tradable::{Quote, Side, Tradable, TradableSnapshot};
use crate::pricing::{Price, PriceCache};
use crate::users::{UserLedger, UserRegistry};
use crate::market::MarketTracker;
use tracing::info;

/// The engine context for one trading venue.
///
/// Owns the product registry, the user registry, the market tracker and the
/// price cache, and passes them into each other explicitly — there is no
/// global state, so independent `TradeBook` instances are fully isolated and
/// dropping one tears the whole venue down.
///
/// The engine is single-threaded by design: every externally observable
/// state transition is ordered by the API-call sequence, callbacks run
/// synchronously on the caller's thread, and publication happens exactly
/// once per outer call after all matching completes.
#[derive(Debug, Default)]
pub struct TradeBook {
    products: ProductRegistry,
    users: UserRegistry,
    market: MarketTracker,
    prices: PriceCache,
}

impl TradeBook {
    /// Create an empty venue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: ProductRegistry::new(),
            users: UserRegistry::new(),
            market: MarketTracker::new(),
            prices: PriceCache::new(),
        }
    }

    /// Register a product symbol (trimmed, uppercased, validated).
    pub fn add_product(&mut self, symbol: &str) -> Result<(), BookError> {
        self.products.add_product(symbol)
    }

    /// Register users by 3-letter code (uppercased; duplicates overwrite).
    pub fn init_users(&mut self, ids: &[&str]) -> Result<(), BookError> {
        self.users.init(ids)
    }

    /// Parse a price string through the venue's price cache.
    pub fn parse_price(&mut self, input: &str) -> Result<Price, BookError> {
        Ok(self.prices.parse(input)?)
    }

    /// The canonical price for a cents value, interned in the venue cache.
    pub fn price(&mut self, cents: i64) -> Price {
        self.prices.intern(cents)
    }

    /// Submit a one-sided day order. Matching and publication run before
    /// this returns; the returned snapshot reflects the post-insert state.
    pub fn add_order(
        &mut self,
        user: &str,
        product: &str,
        price: Price,
        volume: u32,
        side: Side,
    ) -> Result<TradableSnapshot, BookError> {
        let order = Tradable::order(user, product, price, volume, side)?;
        info!("submit {}", order);
        self.products
            .add_tradable(order, &mut self.users, &mut self.market)
    }

    /// Submit a two-sided quote, replacing any quote the user already has
    /// resting for the product. Returns the `(buy, sell)` snapshots.
    pub fn add_quote(
        &mut self,
        user: &str,
        product: &str,
        buy_price: Price,
        buy_volume: u32,
        sell_price: Price,
        sell_volume: u32,
    ) -> Result<(TradableSnapshot, TradableSnapshot), BookError> {
        let quote = Quote::new(product, buy_price, buy_volume, sell_price, sell_volume, user)?;
        info!("submit {}", quote);
        self.products
            .add_quote(quote, &mut self.users, &mut self.market)
    }

    /// Cancel the tradable a snapshot refers to. `Ok(None)` when the id is
    /// no longer resting.
    pub fn cancel(
        &mut self,
        snapshot: &TradableSnapshot,
    ) -> Result<Option<TradableSnapshot>, BookError> {
        self.products
            .cancel(snapshot, &mut self.users, &mut self.market)
    }

    /// Cancel both sides of a user's quote for a symbol.
    pub fn cancel_quote(
        &mut self,
        symbol: &str,
        user: &str,
    ) -> Result<(Option<TradableSnapshot>, Option<TradableSnapshot>), BookError> {
        self.products
            .cancel_quote(symbol, user, &mut self.users, &mut self.market)
    }

    /// Subscribe a registered user to a product's current market.
    pub fn subscribe_current_market(
        &mut self,
        symbol: &str,
        user_id: &str,
    ) -> Result<(), BookError> {
        let user_id = self.users.get_user(user_id)?.user_id().to_string();
        self.market.publisher_mut().subscribe(symbol, &user_id);
        Ok(())
    }

    /// Unsubscribe a user from a product's current market; a no-op when the
    /// user is not subscribed.
    pub fn unsubscribe_current_market(
        &mut self,
        symbol: &str,
        user_id: &str,
    ) -> Result<(), BookError> {
        let user_id = self.users.get_user(user_id)?.user_id().to_string();
        self.market.publisher_mut().unsubscribe(symbol, &user_id);
        Ok(())
    }

    /// Borrow a user's ledger.
    pub fn user(&self, user_id: &str) -> Result<&UserLedger, BookError> {
        self.users.get_user(user_id)
    }

    /// The product registry.
    #[must_use]
    pub fn products(&self) -> &ProductRegistry {
        &self.products
    }

    /// The user registry.
    #[must_use]
    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    /// The market tracker.
    #[must_use]
    pub fn market(&self) -> &MarketTracker {
        &self.market
    }
}
