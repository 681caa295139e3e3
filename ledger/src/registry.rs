//! Account registry: identity to record, in registration order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reclaim_types::AccountId;

use crate::error::LedgerError;
use crate::profile::AccountRecord;

/// Shared handle to one account's record. Locking it serializes all
/// operations on that account.
pub type AccountHandle = Arc<Mutex<AccountRecord>>;

/// The set of registered identities.
///
/// Keeps an append-only registration order next to the lookup map; the
/// leaderboard relies on it for its tie-break.
#[derive(Default)]
pub struct AccountRegistry {
    order: Vec<AccountId>,
    accounts: HashMap<AccountId, AccountHandle>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profile for `identity` with all counters at zero.
    pub fn register(
        &mut self,
        identity: AccountId,
        display_name: impl Into<String>,
    ) -> Result<AccountHandle, LedgerError> {
        if identity.is_null() {
            return Err(LedgerError::InvalidTarget);
        }
        if self.accounts.contains_key(&identity) {
            return Err(LedgerError::AlreadyRegistered(identity.to_string()));
        }
        let handle = Arc::new(Mutex::new(AccountRecord::new(
            identity.clone(),
            display_name,
        )));
        self.order.push(identity.clone());
        self.accounts.insert(identity, Arc::clone(&handle));
        Ok(handle)
    }

    /// Re-insert a previously captured record (snapshot restore).
    pub(crate) fn insert_record(&mut self, record: AccountRecord) -> Result<(), LedgerError> {
        let identity = record.profile.identity.clone();
        if self.accounts.contains_key(&identity) {
            return Err(LedgerError::AlreadyRegistered(identity.to_string()));
        }
        self.order.push(identity.clone());
        self.accounts.insert(identity, Arc::new(Mutex::new(record)));
        Ok(())
    }

    pub fn is_registered(&self, identity: &AccountId) -> bool {
        self.accounts.contains_key(identity)
    }

    pub fn get(&self, identity: &AccountId) -> Result<AccountHandle, LedgerError> {
        self.accounts
            .get(identity)
            .cloned()
            .ok_or_else(|| LedgerError::NotRegistered(identity.to_string()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Account handles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AccountHandle> {
        self.order.iter().filter_map(|id| self.accounts.get(id))
    }
}
