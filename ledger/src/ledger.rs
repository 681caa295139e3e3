//! The reward ledger: one owned instance holding all accounts.
//!
//! Locking: the registry sits behind an `RwLock` whose entries are per-account
//! mutexes. Registration takes the write lock; every other operation holds
//! the read lock only long enough to clone the account handle, then works
//! under that single account's mutex. Operations on different accounts never
//! wait on each other; operations on one account are serialized.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reclaim_access::{is_privileged, AccessGate, AdminRegistry};
use reclaim_credit::CreditLedger;
use reclaim_types::{AccountId, CreditAmount, LedgerParams};
use tracing::info;

use crate::error::{LedgerError, SnapshotError};
use crate::leaderboard;
use crate::profile::{AccountRecord, Profile, Submission};
use crate::redemption::{Redemption, RedemptionEngine};
use crate::registry::{AccountHandle, AccountRegistry};
use crate::snapshot::LedgerSnapshot;
use crate::submission::SubmissionLedger;

pub struct RewardLedger {
    registry: RwLock<AccountRegistry>,
    access: AdminRegistry,
    credit: Arc<dyn CreditLedger>,
    submissions: SubmissionLedger,
    redemption: RedemptionEngine,
}

impl RewardLedger {
    pub fn new(
        params: LedgerParams,
        access: AdminRegistry,
        credit: Arc<dyn CreditLedger>,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            registry: RwLock::new(AccountRegistry::new()),
            access,
            credit,
            submissions: SubmissionLedger,
            redemption: RedemptionEngine::new(params)?,
        })
    }

    /// Rebuild a ledger from a snapshot after checking its integrity.
    pub fn restore(
        snapshot: LedgerSnapshot,
        params: LedgerParams,
        credit: Arc<dyn CreditLedger>,
    ) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let access = AdminRegistry::with_admins(snapshot.owner, snapshot.admins);
        let ledger = Self::new(params, access, credit)?;
        {
            let mut registry = ledger.registry_mut()?;
            for record in snapshot.accounts {
                registry.insert_record(record)?;
            }
        }
        info!(accounts = ledger.account_count()?, "ledger restored from snapshot");
        Ok(ledger)
    }

    pub fn params(&self) -> &LedgerParams {
        self.redemption.params()
    }

    // ── Registry ────────────────────────────────────────────────────────

    pub fn register(
        &self,
        identity: &AccountId,
        display_name: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.registry_mut()?
            .register(identity.clone(), display_name)?;
        info!(account = %identity, "account registered");
        Ok(())
    }

    pub fn is_registered(&self, identity: &AccountId) -> Result<bool, LedgerError> {
        Ok(self.registry()?.is_registered(identity))
    }

    pub fn account_count(&self) -> Result<usize, LedgerError> {
        Ok(self.registry()?.len())
    }

    pub fn profile(&self, identity: &AccountId) -> Result<Profile, LedgerError> {
        let handle = self.account(identity)?;
        let record = lock(&handle)?;
        Ok(record.profile.clone())
    }

    // ── Submissions ─────────────────────────────────────────────────────

    /// Ordered, unfiltered submission list of `identity`.
    pub fn submissions(&self, identity: &AccountId) -> Result<Vec<Submission>, LedgerError> {
        let handle = self.account(identity)?;
        let record = lock(&handle)?;
        Ok(record.submissions.clone())
    }

    /// Record a new pending submission for the caller. Returns its index.
    pub fn submit(&self, identity: &AccountId, quantity: u64) -> Result<usize, LedgerError> {
        let handle = self.account(identity)?;
        let mut record = lock(&handle)?;
        self.submissions.submit(&mut record, quantity)
    }

    /// Verify submission `index` of `identity`. Requires owner or admin.
    pub fn verify(
        &self,
        caller: &AccountId,
        identity: &AccountId,
        index: usize,
    ) -> Result<(), LedgerError> {
        if !is_privileged(&self.access, caller) {
            return Err(LedgerError::Unauthorized(caller.to_string()));
        }
        let handle = self.account(identity)?;
        let mut record = lock(&handle)?;
        let quantity = self.submissions.verify(&mut record, index)?;
        info!(verifier = %caller, account = %identity, index, quantity, "submission verified");
        Ok(())
    }

    // ── Redemption ──────────────────────────────────────────────────────

    /// Verified quantity of `identity` not yet converted to credit.
    pub fn redeemable(&self, identity: &AccountId) -> Result<u64, LedgerError> {
        Ok(self.profile(identity)?.redeemable())
    }

    /// Convert the caller's verified quantity into credit.
    ///
    /// The account stays locked across the external transfer so no other
    /// operation on it can observe the intermediate counters.
    pub fn redeem(&self, identity: &AccountId) -> Result<Redemption, LedgerError> {
        let handle = self.account(identity)?;
        let mut record = lock(&handle)?;
        self.redemption.redeem(&mut record, self.credit.as_ref())
    }

    /// Balance of `account` on the external credit ledger.
    pub fn credit_balance_of(&self, account: &AccountId) -> CreditAmount {
        self.credit.balance_of(account)
    }

    // ── Leaderboard ─────────────────────────────────────────────────────

    /// Top `n` accounts by verified quantity.
    pub fn top_n(&self, n: usize) -> Result<Vec<Profile>, LedgerError> {
        let profiles = self
            .records()?
            .into_iter()
            .map(|record| record.profile)
            .collect();
        leaderboard::top_n(profiles, n)
    }

    // ── Access ──────────────────────────────────────────────────────────

    pub fn owner(&self) -> &AccountId {
        self.access.owner()
    }

    pub fn is_owner(&self, caller: &AccountId) -> bool {
        self.access.is_owner(caller)
    }

    pub fn is_admin(&self, caller: &AccountId) -> bool {
        self.access.is_admin(caller)
    }

    pub fn admins(&self) -> Result<Vec<AccountId>, LedgerError> {
        Ok(self.access.admins()?)
    }

    pub fn add_admin(&self, caller: &AccountId, target: &AccountId) -> Result<(), LedgerError> {
        Ok(self.access.add_admin(caller, target)?)
    }

    pub fn remove_admin(&self, caller: &AccountId, target: &AccountId) -> Result<(), LedgerError> {
        Ok(self.access.remove_admin(caller, target)?)
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    /// Capture all accounts and the admin set.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let accounts = self.records()?;
        Ok(LedgerSnapshot::create(
            self.access.owner().clone(),
            self.admins()?,
            accounts,
        ))
    }

    /// Copy every record in registration order.
    ///
    /// Holding the registry read lock blocks registration for the duration;
    /// each record is copied under its own lock. Every mutation touches a
    /// single account, so the copy matches some serial order of operations.
    fn records(&self) -> Result<Vec<AccountRecord>, LedgerError> {
        let registry = self.registry()?;
        registry
            .iter()
            .map(|handle| lock(handle).map(|record| record.clone()))
            .collect()
    }

    fn registry(&self) -> Result<RwLockReadGuard<'_, AccountRegistry>, LedgerError> {
        self.registry.read().map_err(|_| LedgerError::Poisoned)
    }

    fn registry_mut(&self) -> Result<RwLockWriteGuard<'_, AccountRegistry>, LedgerError> {
        self.registry.write().map_err(|_| LedgerError::Poisoned)
    }

    fn account(&self, identity: &AccountId) -> Result<AccountHandle, LedgerError> {
        self.registry()?.get(identity)
    }
}

fn lock(handle: &Mutex<AccountRecord>) -> Result<MutexGuard<'_, AccountRecord>, LedgerError> {
    handle.lock().map_err(|_| LedgerError::Poisoned)
}
