//! Immutable monetary value expressed as a signed count of cents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value stored as a signed number of cents.
///
/// Negative, zero and positive prices are all legitimate. Equality and
/// ordering follow the integer ordering of the cents value, so `Price` can be
/// used directly as an ordered map key. All comparisons are by value; callers
/// must never rely on any form of handle identity (see
/// [`PriceCache`](super::PriceCache), whose eviction may hand out fresh but
/// equivalent values).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Price(i64);

impl Price {
    /// The zero price, `$0.00`. Used as the null-market sentinel value.
    pub const ZERO: Price = Price(0);

    /// Create a price from a signed cents value.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Price(cents)
    }

    /// The raw cents value.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true when this price is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the sum of this price and `other`.
    #[must_use]
    pub fn add(&self, other: Price) -> Price {
        Price(self.0 + other.0)
    }

    /// Returns this price minus `other`.
    #[must_use]
    pub fn subtract(&self, other: Price) -> Price {
        Price(self.0 - other.0)
    }

    /// Returns this price scaled by the signed integer `n`.
    #[must_use]
    pub fn multiply(&self, n: i64) -> Price {
        Price(self.0 * n)
    }
}

/// Renders the dollars portion with `,` thousands separators.
fn dollars_with_separators(mut dollars: i64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = dollars % 1_000;
        dollars /= 1_000;
        if dollars == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{group:03}"));
    }
    groups.reverse();
    groups.join(",")
}

impl fmt::Display for Price {
    /// Formats as `$` then an optional `-`, the absolute dollars with
    /// thousands separators, a dot, and exactly two cent digits. The sign
    /// sits after the dollar symbol: `$-1,234.05`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs_cents = self.0.unsigned_abs();
        let dollars = (abs_cents / 100) as i64;
        let cents_part = abs_cents % 100;
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "${sign}{}.{cents_part:02}",
            dollars_with_separators(dollars)
        )
    }
}
