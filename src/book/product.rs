//! A product book: the coupled BUY and SELL sides for one symbol, plus the
//! matching loop and current-market publication.

use super::error::BookError;
use super::side::ProductBookSide;
use super::tradable::{validate_product, Quote, Side, Tradable, TradableSnapshot};
use crate::market::MarketTracker;
use crate::users::UserRegistry;
use std::cmp::{max, min};
use std::fmt;
use tracing::trace;

/// The order book for one product symbol.
///
/// Couples a BUY and a SELL [`ProductBookSide`] and drives matching between
/// them. Every public mutating operation runs the matching loop where
/// crossing is possible and then publishes the post-match top of book
/// exactly once, however many levels matching touched.
#[derive(Debug)]
pub struct ProductBook {
    product: String,
    buy_side: ProductBookSide,
    sell_side: ProductBookSide,
}

impl ProductBook {
    /// Create an empty book for a validated product symbol.
    pub fn new(product: &str) -> Result<Self, BookError> {
        validate_product(product)?;
        Ok(Self {
            product: product.to_string(),
            buy_side: ProductBookSide::new(Side::Buy),
            sell_side: ProductBookSide::new(Side::Sell),
        })
    }

    /// The product symbol this book trades.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// The BUY side of this book.
    #[must_use]
    pub fn buy_side(&self) -> &ProductBookSide {
        &self.buy_side
    }

    /// The SELL side of this book.
    #[must_use]
    pub fn sell_side(&self) -> &ProductBookSide {
        &self.sell_side
    }

    /// Insert a tradable on its side, match, publish, and return the
    /// post-insert snapshot (matching may have moved the live state past it).
    pub fn add_tradable(
        &mut self,
        tradable: Tradable,
        users: &mut UserRegistry,
        market: &mut MarketTracker,
    ) -> Result<TradableSnapshot, BookError> {
        let snapshot = self.side_mut(tradable.side()).insert(tradable, users)?;
        self.try_trade(users)?;
        self.publish(users, market);
        Ok(snapshot)
    }

    /// Replace the user's quote: any resting quote sides for the user leave
    /// both sides first, then the BUY and SELL quote sides are inserted,
    /// matching runs, and the book publishes once. Returns the post-insert
    /// `(buy, sell)` snapshots.
    pub fn add_quote(
        &mut self,
        quote: Quote,
        users: &mut UserRegistry,
        market: &mut MarketTracker,
    ) -> Result<(TradableSnapshot, TradableSnapshot), BookError> {
        self.buy_side.remove_quotes_for_user(quote.user(), users)?;
        self.sell_side.remove_quotes_for_user(quote.user(), users)?;

        let (buy, sell) = quote.into_sides();
        let buy_snapshot = self.buy_side.insert(buy, users)?;
        let sell_snapshot = self.sell_side.insert(sell, users)?;
        self.try_trade(users)?;
        self.publish(users, market);
        Ok((buy_snapshot, sell_snapshot))
    }

    /// Cancel a tradable by id on the given side, then publish. Returns
    /// `Ok(None)` when no tradable carries the id.
    pub fn cancel(
        &mut self,
        side: Side,
        tradable_id: &str,
        users: &mut UserRegistry,
        market: &mut MarketTracker,
    ) -> Result<Option<TradableSnapshot>, BookError> {
        let result = self.side_mut(side).cancel(tradable_id, users)?;
        self.publish(users, market);
        Ok(result)
    }

    /// Remove the user's resting quote sides from both sides, then publish.
    /// Either element is `None` when that side held no quote for the user.
    pub fn remove_quotes_for_user(
        &mut self,
        user: &str,
        users: &mut UserRegistry,
        market: &mut MarketTracker,
    ) -> Result<(Option<TradableSnapshot>, Option<TradableSnapshot>), BookError> {
        let buy = self.buy_side.remove_quotes_for_user(user, users)?;
        let sell = self.sell_side.remove_quotes_for_user(user, users)?;
        self.publish(users, market);
        Ok((buy, sell))
    }

    /// A one-line top-of-book summary for one side, `$0.00 x 0` when empty.
    #[must_use]
    pub fn top_of_book_string(&self, side: Side) -> String {
        let book_side = match side {
            Side::Buy => &self.buy_side,
            Side::Sell => &self.sell_side,
        };
        match book_side.top_price() {
            Some(price) if book_side.top_volume() > 0 => {
                format!("Top of {side} book: {price} x {}", book_side.top_volume())
            }
            _ => format!("Top of {side} book: $0.00 x 0"),
        }
    }

    /// The matching loop.
    ///
    /// The round target is `max` of the two top volumes — deliberately more
    /// than the first round can move, so matching cascades into deeper
    /// levels when crossings reappear. Each iteration re-reads both tops,
    /// stops when either side is empty or the best SELL exceeds the best
    /// BUY, and otherwise trades `min` of the two top volumes out of each
    /// side, thresholded by the opposite side's former top.
    fn try_trade(&mut self, users: &mut UserRegistry) -> Result<(), BookError> {
        let (Some(best_buy), Some(best_sell)) =
            (self.buy_side.top_price(), self.sell_side.top_price())
        else {
            return Ok(());
        };
        if best_sell > best_buy {
            return Ok(());
        }

        let mut total_to_trade = max(self.buy_side.top_volume(), self.sell_side.top_volume());
        trace!(
            "{}: crossing at {} / {}, target {}",
            self.product,
            best_buy,
            best_sell,
            total_to_trade
        );

        while total_to_trade > 0 {
            let (Some(best_buy), Some(best_sell)) =
                (self.buy_side.top_price(), self.sell_side.top_price())
            else {
                return Ok(());
            };
            if best_sell > best_buy {
                return Ok(());
            }

            let to_trade = min(self.buy_side.top_volume(), self.sell_side.top_volume());
            if to_trade == 0 {
                return Ok(());
            }

            // Each side consumes against the opposite side's former top.
            self.buy_side.trade_out(best_sell, to_trade, users)?;
            self.sell_side.trade_out(best_buy, to_trade, users)?;

            total_to_trade -= to_trade;
        }
        Ok(())
    }

    /// Publish the current top of book through the market tracker.
    fn publish(&self, users: &mut UserRegistry, market: &mut MarketTracker) {
        market.update_market(
            &self.product,
            self.buy_side.top_price(),
            self.buy_side.top_volume(),
            self.sell_side.top_price(),
            self.sell_side.top_volume(),
            users,
        );
    }

    fn side_mut(&mut self, side: Side) -> &mut ProductBookSide {
        match side {
            Side::Buy => &mut self.buy_side,
            Side::Sell => &mut self.sell_side,
        }
    }
}

impl fmt::Display for ProductBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        out.push_str("--------------------------------------------\n");
        out.push_str(&format!("Product Book: {}\n", self.product));
        out.push_str(&self.buy_side.to_string());
        out.push('\n');
        out.push_str(&self.sell_side.to_string());
        out.push_str("--------------------------------------------\n");
        write!(f, "{}", out.trim_end())
    }
}
