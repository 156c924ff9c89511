//! Fan-out of current-market snapshots to subscribed users.

use super::side::MarketSide;
use crate::users::UserRegistry;
use std::collections::HashMap;
use tracing::debug;

/// Maps product symbols to the users subscribed to their current market.
///
/// Subscribers are user ids; delivery routes through the [`UserRegistry`]
/// that owns the ledgers, in subscription order. A subscriber whose ledger
/// has since been dropped is skipped.
#[derive(Debug, Default)]
pub struct MarketPublisher {
    subscriptions: HashMap<String, Vec<String>>,
}

impl MarketPublisher {
    /// Create a publisher with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
        }
    }

    /// Append a subscriber to the symbol's list.
    pub fn subscribe(&mut self, symbol: &str, user_id: &str) {
        self.subscriptions
            .entry(symbol.to_string())
            .or_default()
            .push(user_id.to_string());
        debug!("{} subscribed to current market for {}", user_id, symbol);
    }

    /// Remove the first matching subscriber from the symbol's list; a no-op
    /// when the user is not subscribed.
    pub fn unsubscribe(&mut self, symbol: &str, user_id: &str) {
        if let Some(subscribers) = self.subscriptions.get_mut(symbol) {
            if let Some(position) = subscribers.iter().position(|id| id == user_id) {
                subscribers.remove(position);
            }
        }
    }

    /// The subscribers registered for a symbol, in subscription order.
    #[must_use]
    pub fn subscribers(&self, symbol: &str) -> &[String] {
        self.subscriptions
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Deliver a current-market pair to every subscriber of the symbol, in
    /// subscription order.
    pub fn accept(
        &self,
        symbol: &str,
        buy: &MarketSide,
        sell: &MarketSide,
        users: &mut UserRegistry,
    ) {
        let Some(subscribers) = self.subscriptions.get(symbol) else {
            return;
        };
        for user_id in subscribers {
            if let Ok(ledger) = users.get_user_mut(user_id) {
                ledger.update_current_market(symbol, *buy, *sell);
            }
        }
    }
}
