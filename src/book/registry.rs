//! Registry routing operations to per-symbol product books.

use super::error::BookError;
use super::product::ProductBook;
use super::tradable::{validate_product, Quote, Tradable, TradableSnapshot};
use crate::market::MarketTracker;
use crate::users::UserRegistry;
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

/// Process-wide mapping from normalized product symbol to [`ProductBook`].
///
/// Acts as the facade for the add/cancel/quote operations, routing each to
/// the right book. The book layer keeps the [`UserRegistry`] current as it
/// mutates state, so the snapshots returned here are submission-time copies
/// while the ledgers already reflect any matching that ran.
#[derive(Debug, Default)]
pub struct ProductRegistry {
    books: HashMap<String, ProductBook>,
}

impl ProductRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            books: HashMap::new(),
        }
    }

    /// Create a book for the symbol (trimmed and uppercased). A later
    /// insertion for the same symbol overwrites the earlier book.
    pub fn add_product(&mut self, symbol: &str) -> Result<(), BookError> {
        let symbol = normalize_symbol(symbol)?;
        let book = ProductBook::new(&symbol)?;
        info!("added product book for {}", symbol);
        self.books.insert(symbol, book);
        Ok(())
    }

    /// Borrow the book for a symbol; fails with `DataValidation` when the
    /// product has not been added.
    pub fn get_product_book(&self, symbol: &str) -> Result<&ProductBook, BookError> {
        let symbol = normalize_symbol(symbol)?;
        self.books.get(&symbol).ok_or_else(|| {
            BookError::DataValidation(format!("no product book exists for symbol: {symbol}"))
        })
    }

    /// A uniformly random registered symbol; fails when no products exist.
    pub fn random_product(&self) -> Result<String, BookError> {
        if self.books.is_empty() {
            return Err(BookError::DataValidation(
                "no products exist to select from".to_string(),
            ));
        }
        let symbols: Vec<&String> = self.books.keys().collect();
        let index = rand::thread_rng().gen_range(0..symbols.len());
        Ok(symbols[index].clone())
    }

    /// All registered symbols, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.books.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Returns true when a book exists for the symbol.
    #[must_use]
    pub fn has_product(&self, symbol: &str) -> bool {
        normalize_symbol(symbol)
            .map(|s| self.books.contains_key(&s))
            .unwrap_or(false)
    }

    /// Number of registered product books.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.books.len()
    }

    /// Route a tradable to its product's book and return the post-insert
    /// snapshot. The book mirrors every later volume change into the
    /// owner's ledger itself, so no re-mirror happens here — it would
    /// overwrite post-match fills with the stale post-insert state.
    pub fn add_tradable(
        &mut self,
        tradable: Tradable,
        users: &mut UserRegistry,
        market: &mut MarketTracker,
    ) -> Result<TradableSnapshot, BookError> {
        let book = self.book_mut(tradable.product())?;
        book.add_tradable(tradable, users, market)
    }

    /// Route a quote to its product's book (replacing the user's resting
    /// quote sides) and return the post-insert `(buy, sell)` snapshots. As
    /// with [`Self::add_tradable`], the ledgers are already current when
    /// this returns, including fills from a quote that crossed on arrival.
    pub fn add_quote(
        &mut self,
        quote: Quote,
        users: &mut UserRegistry,
        market: &mut MarketTracker,
    ) -> Result<(TradableSnapshot, TradableSnapshot), BookError> {
        let book = self.book_mut(quote.product())?;
        book.add_quote(quote, users, market)
    }

    /// Cancel the tradable a snapshot refers to. An unknown id is not an
    /// error: a diagnostic is logged and `Ok(None)` returned.
    pub fn cancel(
        &mut self,
        snapshot: &TradableSnapshot,
        users: &mut UserRegistry,
        market: &mut MarketTracker,
    ) -> Result<Option<TradableSnapshot>, BookError> {
        let book = self.book_mut(&snapshot.product)?;
        let result = book.cancel(snapshot.side, &snapshot.id, users, market)?;
        match result {
            Some(cancelled) => {
                users.update_tradable(&cancelled.user, cancelled.clone())?;
                Ok(Some(cancelled))
            }
            None => {
                warn!(
                    "cancel failed for tradable id {}, product {}, side {}",
                    snapshot.id, snapshot.product, snapshot.side
                );
                Ok(None)
            }
        }
    }

    /// Cancel both sides of a user's quote for a symbol. Mirrors whichever
    /// snapshots come back and returns them as `(buy, sell)`.
    pub fn cancel_quote(
        &mut self,
        symbol: &str,
        user: &str,
        users: &mut UserRegistry,
        market: &mut MarketTracker,
    ) -> Result<(Option<TradableSnapshot>, Option<TradableSnapshot>), BookError> {
        let user = user.trim().to_ascii_uppercase();
        let book = self.book_mut(symbol)?;
        let (buy, sell) = book.remove_quotes_for_user(&user, users, market)?;
        for snapshot in [&buy, &sell].into_iter().flatten() {
            users.update_tradable(&snapshot.user, snapshot.clone())?;
        }
        Ok((buy, sell))
    }

    fn book_mut(&mut self, symbol: &str) -> Result<&mut ProductBook, BookError> {
        let symbol = normalize_symbol(symbol)?;
        self.books.get_mut(&symbol).ok_or_else(|| {
            BookError::DataValidation(format!("no product book exists for symbol: {symbol}"))
        })
    }
}

/// Trims, uppercases and validates a product symbol.
fn normalize_symbol(symbol: &str) -> Result<String, BookError> {
    let symbol = symbol.trim().to_ascii_uppercase();
    validate_product(&symbol)?;
    Ok(symbol)
}

impl fmt::Display for ProductRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.books.is_empty() {
            return write!(f, "No ProductBooks currently exist.");
        }
        let mut out = String::new();
        for symbol in self.symbols() {
            out.push_str(&self.books[&symbol].to_string());
            out.push('\n');
        }
        write!(f, "{}", out.trim_end())
    }
}
