//! Registry owning every user ledger in the system.

use super::ledger::UserLedger;
use crate::book::error::BookError;
use crate::book::tradable::{validate_user, TradableSnapshot};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// System-wide registry of users, keyed by uppercased 3-letter code.
///
/// The registry owns the [`UserLedger`] instances; book operations route
/// snapshot updates and market deliveries through it.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: BTreeMap<String, UserLedger>,
}

impl UserRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
        }
    }

    /// Create a ledger for each id. Ids are validated as 3 letters and
    /// normalized to uppercase; a duplicate id overwrites the earlier entry.
    pub fn init(&mut self, ids: &[&str]) -> Result<(), BookError> {
        for id in ids {
            let ledger = UserLedger::new(id)?;
            debug!("registered user {}", ledger.user_id());
            self.users.insert(ledger.user_id().to_string(), ledger);
        }
        Ok(())
    }

    /// Borrow a user's ledger.
    pub fn get_user(&self, user_id: &str) -> Result<&UserLedger, BookError> {
        let key = validate_user(user_id.trim())?;
        self.users
            .get(&key)
            .ok_or_else(|| BookError::UserNotFound(user_id.to_string()))
    }

    /// Mutably borrow a user's ledger.
    pub fn get_user_mut(&mut self, user_id: &str) -> Result<&mut UserLedger, BookError> {
        let key = validate_user(user_id.trim())?;
        self.users
            .get_mut(&key)
            .ok_or_else(|| BookError::UserNotFound(user_id.to_string()))
    }

    /// Record the latest snapshot for one of the user's tradables.
    ///
    /// Fails with `DataValidation` when the user has not been registered, so
    /// books only ever trade on behalf of known users.
    pub fn update_tradable(
        &mut self,
        user_id: &str,
        snapshot: TradableSnapshot,
    ) -> Result<(), BookError> {
        let key = validate_user(user_id.trim())?;
        let ledger = self.users.get_mut(&key).ok_or_else(|| {
            BookError::DataValidation(format!("user does not exist: {user_id}"))
        })?;
        ledger.update_tradable(snapshot);
        Ok(())
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true when no users are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl fmt::Display for UserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for ledger in self.users.values() {
            write!(f, "{ledger}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}
