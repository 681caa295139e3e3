//! Owner/admin capability checks and admin-set management.

use std::collections::BTreeSet;
use std::sync::RwLock;

use reclaim_types::AccountId;
use tracing::info;

use crate::error::AccessError;

/// Capability checks consumed by the ledger.
pub trait AccessGate: Send + Sync {
    /// Whether `caller` is the owner.
    fn is_owner(&self, caller: &AccountId) -> bool;

    /// Whether `caller` is in the explicit admin set.
    fn is_admin(&self, caller: &AccountId) -> bool;
}

/// Owner-or-admin check used for every privileged ledger operation.
///
/// The owner is privileged even when absent from the admin set.
pub fn is_privileged(gate: &dyn AccessGate, caller: &AccountId) -> bool {
    gate.is_owner(caller) || gate.is_admin(caller)
}

/// The owner identity plus a mutable admin set.
pub struct AdminRegistry {
    owner: AccountId,
    admins: RwLock<BTreeSet<AccountId>>,
}

impl AdminRegistry {
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            admins: RwLock::new(BTreeSet::new()),
        }
    }

    /// Create a registry with an initial admin set. Null identities are skipped.
    pub fn with_admins(owner: AccountId, admins: impl IntoIterator<Item = AccountId>) -> Self {
        let admins = admins.into_iter().filter(|a| !a.is_null()).collect();
        Self {
            owner,
            admins: RwLock::new(admins),
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// The explicit admin set, sorted.
    pub fn admins(&self) -> Result<Vec<AccountId>, AccessError> {
        let admins = self.admins.read().map_err(|_| AccessError::Poisoned)?;
        Ok(admins.iter().cloned().collect())
    }

    /// Grant admin rights to `target`. Only the owner may do this.
    ///
    /// Granting to an existing admin is a no-op.
    pub fn add_admin(&self, caller: &AccountId, target: &AccountId) -> Result<(), AccessError> {
        if !self.is_owner(caller) {
            return Err(AccessError::Unauthorized(caller.to_string()));
        }
        if target.is_null() {
            return Err(AccessError::InvalidTarget);
        }
        let mut admins = self.admins.write().map_err(|_| AccessError::Poisoned)?;
        if admins.insert(target.clone()) {
            info!(admin = %target, "admin added");
        }
        Ok(())
    }

    /// Revoke admin rights from `target`. Only the owner may do this.
    pub fn remove_admin(&self, caller: &AccountId, target: &AccountId) -> Result<(), AccessError> {
        if !self.is_owner(caller) {
            return Err(AccessError::Unauthorized(caller.to_string()));
        }
        let mut admins = self.admins.write().map_err(|_| AccessError::Poisoned)?;
        if !admins.remove(target) {
            return Err(AccessError::NotAnAdmin(target.to_string()));
        }
        info!(admin = %target, "admin removed");
        Ok(())
    }
}

impl AccessGate for AdminRegistry {
    fn is_owner(&self, caller: &AccountId) -> bool {
        !caller.is_null() && *caller == self.owner
    }

    fn is_admin(&self, caller: &AccountId) -> bool {
        // A poisoned set fails closed.
        self.admins
            .read()
            .map(|admins| admins.contains(caller))
            .unwrap_or(false)
    }
}
