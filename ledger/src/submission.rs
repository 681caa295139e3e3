//! Submission ledger: append claims and verify them.

use reclaim_types::SubmissionStatus;
use tracing::debug;

use crate::error::LedgerError;
use crate::profile::{AccountRecord, Submission};

/// Applies submit and verify to a single account record.
///
/// The caller holds the account's lock; authorization for `verify` is
/// checked by the caller before the record is looked up.
pub struct SubmissionLedger;

impl SubmissionLedger {
    /// Append a pending submission and return its index.
    pub fn submit(&self, record: &mut AccountRecord, quantity: u64) -> Result<usize, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity);
        }
        let total = record
            .profile
            .total_submitted
            .checked_add(quantity)
            .ok_or(LedgerError::Overflow)?;

        record.submissions.push(Submission::pending(quantity));
        record.profile.total_submitted = total;
        let index = record.submissions.len() - 1;
        debug!(
            account = %record.profile.identity,
            index,
            quantity,
            "submission recorded"
        );
        Ok(index)
    }

    /// Move submission `index` from Pending to Verified and return its quantity.
    pub fn verify(&self, record: &mut AccountRecord, index: usize) -> Result<u64, LedgerError> {
        let len = record.submissions.len();
        let submission = record
            .submissions
            .get(index)
            .copied()
            .ok_or(LedgerError::InvalidIndex { index, len })?;
        if !submission.status.can_advance_to(SubmissionStatus::Verified) {
            return Err(LedgerError::AlreadyVerified(index));
        }
        let total = record
            .profile
            .total_verified
            .checked_add(submission.quantity)
            .ok_or(LedgerError::Overflow)?;

        record.submissions[index].status = SubmissionStatus::Verified;
        record.profile.total_verified = total;
        debug!(
            account = %record.profile.identity,
            index,
            quantity = submission.quantity,
            "submission verified"
        );
        Ok(submission.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_types::AccountId;

    fn record() -> AccountRecord {
        AccountRecord::new(AccountId::new("alice"), "Alice")
    }

    #[test]
    fn submit_appends_pending() {
        let mut r = record();
        assert_eq!(SubmissionLedger.submit(&mut r, 7).unwrap(), 0);
        assert_eq!(SubmissionLedger.submit(&mut r, 3).unwrap(), 1);
        assert_eq!(r.profile.total_submitted, 10);
        assert!(r
            .submissions
            .iter()
            .all(|s| s.status == SubmissionStatus::Pending));
        assert!(r.is_consistent());
    }

    #[test]
    fn zero_quantity_rejected() {
        let mut r = record();
        assert_eq!(
            SubmissionLedger.submit(&mut r, 0),
            Err(LedgerError::InvalidQuantity)
        );
        assert!(r.submissions.is_empty());
        assert_eq!(r.profile.total_submitted, 0);
    }

    #[test]
    fn submit_overflow_leaves_record_untouched() {
        let mut r = record();
        SubmissionLedger.submit(&mut r, u64::MAX).unwrap();
        assert_eq!(SubmissionLedger.submit(&mut r, 1), Err(LedgerError::Overflow));
        assert_eq!(r.submissions.len(), 1);
    }

    #[test]
    fn verify_once() {
        let mut r = record();
        SubmissionLedger.submit(&mut r, 12).unwrap();
        assert_eq!(SubmissionLedger.verify(&mut r, 0).unwrap(), 12);
        assert_eq!(
            SubmissionLedger.verify(&mut r, 0),
            Err(LedgerError::AlreadyVerified(0))
        );
        assert_eq!(r.profile.total_verified, 12);
        assert_eq!(r.submissions[0].status, SubmissionStatus::Verified);
    }

    #[test]
    fn redeemed_submission_cannot_be_verified_again() {
        let mut r = record();
        SubmissionLedger.submit(&mut r, 4).unwrap();
        SubmissionLedger.verify(&mut r, 0).unwrap();
        r.submissions[0].status = SubmissionStatus::Redeemed;
        assert_eq!(
            SubmissionLedger.verify(&mut r, 0),
            Err(LedgerError::AlreadyVerified(0))
        );
        assert_eq!(r.profile.total_verified, 4);
        assert_eq!(r.submissions[0].status, SubmissionStatus::Redeemed);
    }

    #[test]
    fn verify_out_of_range() {
        let mut r = record();
        SubmissionLedger.submit(&mut r, 1).unwrap();
        assert_eq!(
            SubmissionLedger.verify(&mut r, 1),
            Err(LedgerError::InvalidIndex { index: 1, len: 1 })
        );
    }
}
