//! Internal utility functions shared across the crate.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter backing tradable id generation.
static TRADABLE_TICK: AtomicU64 = AtomicU64::new(1);

/// Returns the next tradable tick.
///
/// Ticks are strictly increasing within a process, which makes tradable ids
/// unique even when the same user submits the same product at the same price
/// repeatedly. The value carries no wall-clock meaning and must not be
/// interpreted as a timestamp.
pub fn next_tradable_tick() -> u64 {
    TRADABLE_TICK.fetch_add(1, Ordering::Relaxed)
}
