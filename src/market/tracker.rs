//! Composes and publishes current-market snapshots.

use super::publisher::MarketPublisher;
use super::side::MarketSide;
use crate::pricing::Price;
use crate::users::UserRegistry;
use tracing::trace;

/// Receives top-of-book updates from the product books, prints the current
/// market banner and forwards the snapshot pair to the [`MarketPublisher`].
#[derive(Debug, Default)]
pub struct MarketTracker {
    publisher: MarketPublisher,
}

impl MarketTracker {
    /// Create a tracker with an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            publisher: MarketPublisher::new(),
        }
    }

    /// The publisher this tracker forwards to.
    #[must_use]
    pub fn publisher(&self) -> &MarketPublisher {
        &self.publisher
    }

    /// Mutable access to the publisher, for subscription management.
    pub fn publisher_mut(&mut self) -> &mut MarketPublisher {
        &mut self.publisher
    }

    /// Accept a top-of-book update for `symbol`.
    ///
    /// The market width is `sell - buy`, or `$0.00` when either side is
    /// absent. A side whose price is absent or whose volume is zero is
    /// replaced by the null-market sentinel `$0.00x0`. The banner prints to
    /// stdout, then the pair fans out to the symbol's subscribers.
    pub fn update_market(
        &mut self,
        symbol: &str,
        buy_price: Option<Price>,
        buy_volume: u32,
        sell_price: Option<Price>,
        sell_volume: u32,
        users: &mut UserRegistry,
    ) {
        let width = match (buy_price, sell_price) {
            (Some(buy), Some(sell)) => sell.subtract(buy),
            _ => Price::ZERO,
        };

        let buy = match buy_price {
            Some(price) if buy_volume != 0 => MarketSide::new(price, buy_volume),
            _ => MarketSide::null_market(),
        };
        let sell = match sell_price {
            Some(price) if sell_volume != 0 => MarketSide::new(price, sell_volume),
            _ => MarketSide::null_market(),
        };

        trace!(
            "current market for {}: {} - {} [{}]",
            symbol,
            buy,
            sell,
            width
        );
        println!("{}", Self::format_banner(symbol, &buy, &sell, width));

        self.publisher.accept(symbol, &buy, &sell, users);
    }

    /// The three-line current market banner.
    #[must_use]
    pub fn format_banner(symbol: &str, buy: &MarketSide, sell: &MarketSide, width: Price) -> String {
        format!(
            "*********** Current Market ***********\n* {symbol} {buy} - {sell} [{width}]\n**************************************"
        )
    }
}
