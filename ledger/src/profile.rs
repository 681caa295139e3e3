//! Per-account profile and submission records.

use reclaim_types::{AccountId, SubmissionStatus};
use serde::{Deserialize, Serialize};

/// Aggregate counters and metadata for one registered identity.
///
/// All quantity counters only ever grow, and
/// `total_redeemed <= total_verified <= total_submitted` holds at all times.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub identity: AccountId,
    pub display_name: String,
    /// Quantity ever submitted.
    pub total_submitted: u64,
    /// Quantity confirmed by a verifier.
    pub total_verified: u64,
    /// Quantity already converted to credit (a multiple of the exchange rate).
    pub total_redeemed: u64,
    /// Credit units granted by redemptions.
    pub credit_balance: u128,
}

impl Profile {
    pub fn new(identity: AccountId, display_name: impl Into<String>) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            total_submitted: 0,
            total_verified: 0,
            total_redeemed: 0,
            credit_balance: 0,
        }
    }

    /// Verified quantity not yet converted to credit.
    pub fn redeemable(&self) -> u64 {
        self.total_verified.saturating_sub(self.total_redeemed)
    }

    /// `total_redeemed <= total_verified <= total_submitted`.
    pub fn counters_ordered(&self) -> bool {
        self.total_redeemed <= self.total_verified && self.total_verified <= self.total_submitted
    }
}

/// One claimed quantity and its verification status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub quantity: u64,
    pub status: SubmissionStatus,
}

impl Submission {
    pub fn pending(quantity: u64) -> Self {
        Self {
            quantity,
            status: SubmissionStatus::Pending,
        }
    }
}

/// A profile together with its ordered submission list.
///
/// This is the unit of atomicity: every mutation touches exactly one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub profile: Profile,
    pub submissions: Vec<Submission>,
}

impl AccountRecord {
    pub fn new(identity: AccountId, display_name: impl Into<String>) -> Self {
        Self {
            profile: Profile::new(identity, display_name),
            submissions: Vec::new(),
        }
    }

    /// Check the counters against the submission list.
    ///
    /// Submitted quantity must equal the sum over all submissions and verified
    /// quantity the sum over verified or redeemed submissions.
    pub fn is_consistent(&self) -> bool {
        let mut submitted: u128 = 0;
        let mut verified: u128 = 0;
        for s in &self.submissions {
            if s.quantity == 0 {
                return false;
            }
            submitted += s.quantity as u128;
            if s.status.is_verified() {
                verified += s.quantity as u128;
            }
        }
        self.profile.counters_ordered()
            && submitted == self.profile.total_submitted as u128
            && verified == self.profile.total_verified as u128
    }
}
