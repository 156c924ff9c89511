//! One price-ordered side of a product book.

use super::error::BookError;
use super::tradable::{validate_user, Side, Tradable, TradableKind, TradableSnapshot};
use crate::pricing::Price;
use crate::users::UserRegistry;
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// One side (BUY or SELL) of a product book: an ordered map from price to a
/// FIFO slot of resting tradables.
///
/// The map key order is ascending; side order is derived from it (ascending
/// for SELL, descending for BUY), so the best price is the first key for
/// SELL and the last key for BUY. Mutating traversals snapshot the key list
/// up front and defer level pruning until iteration is over — traversal
/// bodies may mutate slots but never add or remove keys mid-walk.
#[derive(Debug)]
pub struct ProductBookSide {
    side: Side,
    entries: BTreeMap<Price, Vec<Tradable>>,
}

impl ProductBookSide {
    /// Create an empty book side.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            entries: BTreeMap::new(),
        }
    }

    /// Which side of the book this is.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Append a tradable to the FIFO slot at its price, creating the level
    /// if absent. The post-insert snapshot is mirrored into the owner's
    /// ledger and returned.
    ///
    /// Fails when the tradable's side does not match this book side or when
    /// it has no remaining volume.
    pub fn insert(
        &mut self,
        tradable: Tradable,
        users: &mut UserRegistry,
    ) -> Result<TradableSnapshot, BookError> {
        if tradable.side() != self.side {
            return Err(BookError::IllegalArgument(format!(
                "tradable side {} does not match book side {}",
                tradable.side(),
                self.side
            )));
        }
        if tradable.remaining_volume() == 0 {
            return Err(BookError::IllegalArgument(format!(
                "tradable {} has no remaining volume",
                tradable.id()
            )));
        }

        trace!("insert {}", tradable);
        let snapshot = tradable.snapshot();
        self.entries
            .entry(tradable.price())
            .or_default()
            .push(tradable);
        users.update_tradable(&snapshot.user, snapshot.clone())?;
        Ok(snapshot)
    }

    /// Cancel the tradable with the given id, if present.
    ///
    /// Remaining volume moves to cancelled, the tradable leaves its slot and
    /// the post-cancel snapshot is mirrored to the owner's ledger and
    /// returned. Returns `Ok(None)` when no tradable carries the id.
    pub fn cancel(
        &mut self,
        tradable_id: &str,
        users: &mut UserRegistry,
    ) -> Result<Option<TradableSnapshot>, BookError> {
        if tradable_id.is_empty() {
            return Err(BookError::IllegalArgument(
                "tradable id cannot be empty".to_string(),
            ));
        }

        // Key removal is deferred until the walk over the key snapshot ends.
        let mut key_to_prune: Option<Price> = None;
        let mut result: Option<TradableSnapshot> = None;

        'levels: for price in self.ordered_prices() {
            let Some(slot) = self.entries.get_mut(&price) else {
                continue;
            };
            for index in 0..slot.len() {
                if slot[index].id() == tradable_id {
                    let mut tradable = slot.remove(index);
                    tradable.cancel_remaining();
                    trace!("cancel {}", tradable);
                    result = Some(tradable.snapshot());
                    if slot.is_empty() {
                        key_to_prune = Some(price);
                    }
                    break 'levels;
                }
            }
        }

        if let Some(price) = key_to_prune {
            self.entries.remove(&price);
        }
        if let Some(snapshot) = &result {
            users.update_tradable(&snapshot.user, snapshot.clone())?;
        }
        Ok(result)
    }

    /// Cancel the first resting quote side owned by `user`, scanning in side
    /// order. Order-kind tradables are ignored; at most one quote side per
    /// user rests on a side, so the scan stops at the first match. Returns
    /// `Ok(None)` when the user has no resting quote side here.
    pub fn remove_quotes_for_user(
        &mut self,
        user: &str,
        users: &mut UserRegistry,
    ) -> Result<Option<TradableSnapshot>, BookError> {
        let user = validate_user(user)?;

        let mut quote_id: Option<String> = None;
        'levels: for price in self.ordered_prices() {
            let Some(slot) = self.entries.get(&price) else {
                continue;
            };
            for tradable in slot {
                if tradable.kind() == TradableKind::QuoteSide && tradable.user() == user {
                    quote_id = Some(tradable.id().to_string());
                    break 'levels;
                }
            }
        }

        match quote_id {
            Some(id) => self.cancel(&id, users),
            None => Ok(None),
        }
    }

    /// Consume up to `volume` of resting volume at prices at-or-better than
    /// `threshold` — `>=` for BUY, `<=` for SELL.
    ///
    /// Whole levels whose total fits inside the request are swept in FIFO
    /// order. When the request is smaller than the level total, the request
    /// is allocated pro-rata across the level with a fixed denominator and
    /// ceiling rounding; caps redistribute the residual to later FIFO
    /// entries. Every volume change pushes the post-mutation snapshot into
    /// the owner's ledger, FIFO within a level and price-ordered across
    /// levels.
    pub fn trade_out(
        &mut self,
        threshold: Price,
        volume: u32,
        users: &mut UserRegistry,
    ) -> Result<(), BookError> {
        if volume == 0 {
            return Err(BookError::IllegalArgument(
                "volume to trade must be > 0".to_string(),
            ));
        }

        let mut vol_to_trade = volume;
        while vol_to_trade > 0 {
            let Some(top) = self.top_price() else {
                return Ok(());
            };
            let tradable_top = match self.side {
                Side::Buy => top >= threshold,
                Side::Sell => top <= threshold,
            };
            if !tradable_top {
                return Ok(());
            }

            let slot_total = self.sum_volume_at(top);
            if slot_total == 0 {
                self.entries.remove(&top);
                continue;
            }

            if vol_to_trade >= slot_total {
                self.sweep_level(top, users)?;
                self.entries.remove(&top);
                vol_to_trade -= slot_total;
                continue;
            }

            vol_to_trade = self.fill_level_pro_rata(top, slot_total, vol_to_trade, users)?;
            self.prune_if_empty(top);
        }
        Ok(())
    }

    /// Fully fill every tradable at `price` in FIFO order.
    fn sweep_level(&mut self, price: Price, users: &mut UserRegistry) -> Result<(), BookError> {
        let Some(slot) = self.entries.get_mut(&price) else {
            return Ok(());
        };
        let side = self.side;
        let mut fills: Vec<TradableSnapshot> = Vec::with_capacity(slot.len());
        for tradable in slot.iter_mut() {
            let quantity = tradable.remaining_volume();
            if quantity > 0 {
                tradable.fill(quantity);
                trace!("FULL FILL: ({} {}) {}", side, quantity, tradable);
            }
            fills.push(tradable.snapshot());
        }
        slot.clear();
        for snapshot in fills {
            let user = snapshot.user.clone();
            users.update_tradable(&user, snapshot)?;
        }
        Ok(())
    }

    /// Allocate `round_volume` across the slot at `price` proportionally to
    /// each tradable's remaining volume. The denominator is the level total
    /// captured on entry; shares use ceiling rounding and are capped by both
    /// the live remainder and each tradable's own remaining volume, so
    /// ceiling-induced deficits flow to later FIFO entries. Returns the
    /// volume left undone (possible only when entries were capped by their
    /// own remaining volume).
    fn fill_level_pro_rata(
        &mut self,
        price: Price,
        slot_total: u32,
        round_volume: u32,
        users: &mut UserRegistry,
    ) -> Result<u32, BookError> {
        let Some(slot) = self.entries.get_mut(&price) else {
            return Ok(round_volume);
        };
        let side = self.side;
        let mut order_vol_left = round_volume;
        let mut fills: Vec<TradableSnapshot> = Vec::new();

        let mut index = 0;
        while index < slot.len() && order_vol_left > 0 {
            let remaining = slot[index].remaining_volume();
            if remaining == 0 {
                slot.remove(index);
                continue;
            }

            // Fixed denominator: the level total before this round began.
            let share = (u64::from(round_volume) * u64::from(remaining))
                .div_ceil(u64::from(slot_total)) as u32;
            let take = share.min(order_vol_left).min(remaining);
            if take == 0 {
                index += 1;
                continue;
            }

            slot[index].fill(take);
            let snapshot = slot[index].snapshot();
            if snapshot.remaining_volume == 0 {
                trace!("FULL FILL: ({} {}) {}", side, take, slot[index]);
                slot.remove(index);
            } else {
                trace!("PARTIAL FILL: ({} {}) {}", side, take, slot[index]);
                index += 1;
            }
            fills.push(snapshot);
            order_vol_left -= take;
        }

        for snapshot in fills {
            let user = snapshot.user.clone();
            users.update_tradable(&user, snapshot)?;
        }
        Ok(order_vol_left)
    }

    /// The best price on this side, or `None` when the side is empty.
    #[must_use]
    pub fn top_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.entries.keys().next_back().copied(),
            Side::Sell => self.entries.keys().next().copied(),
        }
    }

    /// Total remaining volume at the best price, or 0 when empty.
    #[must_use]
    pub fn top_volume(&self) -> u32 {
        self.top_price().map_or(0, |top| self.sum_volume_at(top))
    }

    /// Snapshots of every resting tradable, price-ordered for this side and
    /// FIFO within each level.
    #[must_use]
    pub fn depth(&self) -> Vec<TradableSnapshot> {
        let mut out = Vec::new();
        for price in self.ordered_prices() {
            if let Some(slot) = self.entries.get(&price) {
                out.extend(slot.iter().map(Tradable::snapshot));
            }
        }
        out
    }

    /// Snapshots of the tradables resting at exactly `price`, FIFO order.
    #[must_use]
    pub fn tradables_at(&self, price: Price) -> Vec<TradableSnapshot> {
        self.entries
            .get(&price)
            .map(|slot| slot.iter().map(Tradable::snapshot).collect())
            .unwrap_or_default()
    }

    /// Returns true when a non-empty level exists at `price`.
    #[must_use]
    pub fn has_level(&self, price: Price) -> bool {
        self.entries.get(&price).is_some_and(|slot| !slot.is_empty())
    }

    /// Returns true when no slot contains any tradable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// The level keys in side order: descending for BUY, ascending for SELL.
    fn ordered_prices(&self) -> Vec<Price> {
        match self.side {
            Side::Buy => self.entries.keys().rev().copied().collect(),
            Side::Sell => self.entries.keys().copied().collect(),
        }
    }

    /// Total remaining volume across the slot at `price`.
    fn sum_volume_at(&self, price: Price) -> u32 {
        self.entries.get(&price).map_or(0, |slot| {
            slot.iter().map(Tradable::remaining_volume).sum()
        })
    }

    /// Remove the level at `price` when its slot is empty.
    fn prune_if_empty(&mut self, price: Price) {
        if let Some(slot) = self.entries.get(&price) {
            if slot.is_empty() {
                self.entries.remove(&price);
            }
        }
    }
}

impl fmt::Display for ProductBookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Side: {}", self.side)?;
        if self.is_empty() {
            writeln!(f, "\t<Empty>")?;
            return Ok(());
        }
        for price in self.ordered_prices() {
            let Some(slot) = self.entries.get(&price) else {
                continue;
            };
            if slot.is_empty() {
                continue;
            }
            writeln!(f, "\t{price}:")?;
            for tradable in slot {
                writeln!(f, "\t\t{tradable}")?;
            }
        }
        Ok(())
    }
}
