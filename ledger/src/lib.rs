//! Recycling reward ledger.
//!
//! Participants register, submit quantities of recyclable items, have each
//! submission verified by a trusted party, and redeem verified quantity for
//! external credit at a fixed exchange rate. A ranking view orders accounts
//! by verified quantity.
//!
//! Every account has its own profile and append-only submission list; the
//! [`RewardLedger`] serializes operations per account and lets different
//! accounts proceed concurrently.
//!
//! Counters per account always satisfy
//! `total_redeemed <= total_verified <= total_submitted`.

pub mod error;
pub mod leaderboard;
pub mod ledger;
pub mod profile;
pub mod redemption;
pub mod registry;
pub mod snapshot;
pub mod submission;

pub use error::{LedgerError, SnapshotError};
pub use leaderboard::top_n;
pub use ledger::RewardLedger;
pub use profile::{AccountRecord, Profile, Submission};
pub use redemption::{Redemption, RedemptionEngine, RedemptionPlan};
pub use registry::{AccountHandle, AccountRegistry};
pub use snapshot::LedgerSnapshot;
pub use submission::SubmissionLedger;
