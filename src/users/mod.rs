//! User ledgers and the registry that owns them.

mod ledger;
mod registry;

pub use ledger::UserLedger;
pub use registry::UserRegistry;
