//! Flyweight cache of canonical [`Price`] values keyed by cents.

use super::error::InvalidPriceError;
use super::price::Price;
use std::collections::BTreeMap;
use tracing::trace;

/// Maximum number of cached price entries before eviction starts.
pub const MAX_ENTRIES: usize = 10_000;

/// A value-keyed flyweight returning canonical [`Price`] handles.
///
/// The cache maps a cents value to the canonical `Price` for that value and
/// is bounded at [`MAX_ENTRIES`]. When an insertion pushes the cache over
/// capacity, the entry with the smallest cents key is evicted until the cache
/// is back within bounds. Eviction is safe: prices are immutable and compared
/// by value, so a re-interned value yields a fresh but equivalent handle.
///
/// In the engine's single-threaded model the cache is unguarded; callers that
/// share one across threads must wrap it in mutual exclusion.
#[derive(Debug, Default)]
pub struct PriceCache {
    entries: BTreeMap<i64, Price>,
}

impl PriceCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the canonical price for the given cents value, inserting it
    /// first if absent. Insertion may evict the smallest-cents entries to
    /// stay within [`MAX_ENTRIES`].
    pub fn intern(&mut self, cents: i64) -> Price {
        if let Some(existing) = self.entries.get(&cents) {
            return *existing;
        }
        let price = Price::from_cents(cents);
        self.entries.insert(cents, price);
        self.trim_to_capacity();
        price
    }

    /// Parse a decimal price string into a canonical price.
    ///
    /// Accepted forms: an optional leading `-`, an optional `$`, `,`
    /// thousands separators, and either no decimal point or a single decimal
    /// point followed by exactly two digits (a bare trailing point reads as
    /// `.00`). Anything else is rejected:
    /// an empty string, characters outside `[0-9$.,-]`, more than one
    /// decimal point, a fractional part that is not two digits, or a value
    /// that does not assemble into a valid cents integer.
    pub fn parse(&mut self, input: &str) -> Result<Price, InvalidPriceError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(InvalidPriceError::new(format!(
                "price string '{input}' cannot be empty"
            )));
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'$' | b'.' | b',' | b'-'))
        {
            return Err(InvalidPriceError::new(format!(
                "price string '{input}' contains non-numeric characters"
            )));
        }

        let mut s = s.replace(['$', ','], "");
        let is_negative = s.starts_with('-');
        if is_negative {
            s.remove(0);
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > 2 {
            return Err(InvalidPriceError::new(format!(
                "price string '{input}' has multiple decimal points"
            )));
        }

        let dollars = if parts[0].is_empty() { "0" } else { parts[0] };
        let cents_part = match parts.get(1) {
            // A bare trailing point ("5.") carries no fractional digits.
            None | Some(&"") => "00",
            Some(frac) if frac.len() == 2 => frac,
            Some(_) => {
                return Err(InvalidPriceError::new(format!(
                    "price string '{input}' must have exactly two cent digits when a decimal is present"
                )));
            }
        };

        let combined = format!("{dollars}{cents_part}");
        let mut cents: i64 = combined.parse().map_err(|_| {
            InvalidPriceError::new(format!("price string '{input}' is not a valid number"))
        })?;
        if is_negative {
            cents = -cents;
        }

        trace!("parsed price string '{}' as {} cents", input, cents);
        Ok(self.intern(cents))
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when a canonical entry exists for the given cents value.
    #[must_use]
    pub fn contains(&self, cents: i64) -> bool {
        self.entries.contains_key(&cents)
    }

    /// Evicts smallest-cents entries until the cache is within capacity.
    fn trim_to_capacity(&mut self) {
        while self.entries.len() > MAX_ENTRIES {
            let evicted = self.entries.pop_first();
            if let Some((cents, _)) = evicted {
                trace!("price cache over capacity, evicted {} cents", cents);
            }
        }
    }
}
