//! Per-user ledger of tradable snapshots and subscribed market state.

use crate::book::error::BookError;
use crate::book::tradable::{validate_user, TradableSnapshot};
use crate::market::MarketSide;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// The ledger kept for one user.
///
/// Holds the latest snapshot seen for every tradable the user has submitted,
/// in insertion order, plus the most recent top-of-book pair delivered for
/// each product the user subscribes to.
#[derive(Debug)]
pub struct UserLedger {
    user_id: String,
    /// Tradable ids in first-seen order; an overwrite keeps its position.
    order: Vec<String>,
    tradables: HashMap<String, TradableSnapshot>,
    current_markets: BTreeMap<String, (MarketSide, MarketSide)>,
}

impl UserLedger {
    /// Create a ledger for the given 3-letter user code (uppercased).
    pub fn new(user_id: &str) -> Result<Self, BookError> {
        Ok(Self {
            user_id: validate_user(user_id)?,
            order: Vec::new(),
            tradables: HashMap::new(),
            current_markets: BTreeMap::new(),
        })
    }

    /// The uppercased user code.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Record the latest snapshot for a tradable, overwriting by id. A
    /// snapshot with an empty id is ignored.
    pub fn update_tradable(&mut self, snapshot: TradableSnapshot) {
        if snapshot.id.is_empty() {
            return;
        }
        if !self.tradables.contains_key(&snapshot.id) {
            self.order.push(snapshot.id.clone());
        }
        self.tradables.insert(snapshot.id.clone(), snapshot);
    }

    /// The latest snapshot recorded for the given tradable id.
    #[must_use]
    pub fn tradable(&self, id: &str) -> Option<&TradableSnapshot> {
        self.tradables.get(id)
    }

    /// All recorded snapshots in insertion order.
    pub fn tradables(&self) -> impl Iterator<Item = &TradableSnapshot> {
        self.order.iter().filter_map(|id| self.tradables.get(id))
    }

    /// Store the latest top-of-book pair for a product, overwriting.
    pub fn update_current_market(&mut self, symbol: &str, buy: MarketSide, sell: MarketSide) {
        self.current_markets.insert(symbol.to_string(), (buy, sell));
    }

    /// The last `(buy, sell)` pair delivered for a product, if any.
    #[must_use]
    pub fn current_market(&self, symbol: &str) -> Option<&(MarketSide, MarketSide)> {
        self.current_markets.get(symbol)
    }

    /// One line per subscribed product: `"{sym} {buy} - {sell}\n"`.
    #[must_use]
    pub fn current_markets(&self) -> String {
        let mut out = String::new();
        for (symbol, (buy, sell)) in &self.current_markets {
            out.push_str(&format!("{symbol} {buy} - {sell}\n"));
        }
        out
    }
}

impl fmt::Display for UserLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  User Id: {}", self.user_id)?;
        for snapshot in self.tradables() {
            writeln!(f, "\t{snapshot}")?;
        }
        Ok(())
    }
}
