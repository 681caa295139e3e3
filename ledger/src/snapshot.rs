//! Ledger snapshots: capture every account and the admin set.
//!
//! The in-memory ledger has no storage of its own; a surrounding service
//! writes snapshots to disk and restores from them at startup. The snapshot
//! hash is computed deterministically from its contents so a truncated or
//! edited file is rejected instead of silently loaded.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use reclaim_types::AccountId;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::profile::AccountRecord;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 over the contents below (excluding `created_at`).
    pub hash: [u8; 32],
    pub version: u32,
    /// Unix seconds when the snapshot was taken.
    pub created_at: u64,
    pub owner: AccountId,
    pub admins: Vec<AccountId>,
    /// Account records in registration order.
    pub accounts: Vec<AccountRecord>,
}

impl LedgerSnapshot {
    pub fn create(owner: AccountId, admins: Vec<AccountId>, accounts: Vec<AccountRecord>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let mut snap = Self {
            hash: [0u8; 32],
            version: SNAPSHOT_VERSION,
            created_at,
            owner,
            admins,
            accounts,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        fn update_str(hasher: &mut Blake2b<U32>, s: &str) {
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        update_str(&mut hasher, self.owner.as_str());
        hasher.update((self.admins.len() as u64).to_le_bytes());
        for admin in &self.admins {
            update_str(&mut hasher, admin.as_str());
        }
        hasher.update((self.accounts.len() as u64).to_le_bytes());
        for account in &self.accounts {
            let p = &account.profile;
            update_str(&mut hasher, p.identity.as_str());
            update_str(&mut hasher, &p.display_name);
            hasher.update(p.total_submitted.to_le_bytes());
            hasher.update(p.total_verified.to_le_bytes());
            hasher.update(p.total_redeemed.to_le_bytes());
            hasher.update(p.credit_balance.to_le_bytes());
            hasher.update((account.submissions.len() as u64).to_le_bytes());
            for s in &account.submissions {
                hasher.update(s.quantity.to_le_bytes());
                update_str(&mut hasher, s.status.as_str());
            }
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Whether the stored hash matches the contents.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Full integrity check: version, hash, unique identities, and the
    /// per-account counter invariants.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        if !self.verify() {
            return Err(SnapshotError::HashMismatch);
        }
        let mut seen = HashSet::with_capacity(self.accounts.len());
        for account in &self.accounts {
            let identity = &account.profile.identity;
            if identity.is_null() || !seen.insert(identity) {
                return Err(SnapshotError::DuplicateAccount(identity.to_string()));
            }
            if !account.is_consistent() {
                return Err(SnapshotError::InconsistentAccount(identity.to_string()));
            }
        }
        Ok(())
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Deserialize a snapshot from bytes. Does not validate; see [`Self::validate`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}
