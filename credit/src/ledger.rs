//! The credit ledger seam.

use reclaim_types::{AccountId, CreditAmount};

use crate::error::TransferError;

/// An external ledger of fungible credit.
///
/// `transfer` pays `amount` (in base units) from the ledger's treasury to
/// `to`. It is either fully applied or not applied at all.
pub trait CreditLedger: Send + Sync {
    fn transfer(&self, to: &AccountId, amount: CreditAmount) -> Result<(), TransferError>;

    fn balance_of(&self, account: &AccountId) -> CreditAmount;
}
