//! Nullable credit ledger: unlimited reserve, recorded transfers, injectable failures.

use reclaim_credit::{CreditLedger, TransferError};
use reclaim_types::{AccountId, CreditAmount};
use std::collections::HashMap;
use std::sync::Mutex;

/// A credit ledger for tests.
///
/// Every successful transfer is recorded. While a failure is set, every
/// transfer returns it and nothing is recorded.
pub struct NullCreditLedger {
    transfers: Mutex<Vec<(AccountId, CreditAmount)>>,
    balances: Mutex<HashMap<AccountId, CreditAmount>>,
    failure: Mutex<Option<TransferError>>,
}

impl NullCreditLedger {
    pub fn new() -> Self {
        Self {
            transfers: Mutex::new(Vec::new()),
            balances: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every subsequent transfer fail with `error`.
    pub fn fail_with(&self, error: TransferError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Let transfers succeed again.
    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// All successful transfers, in order.
    pub fn transfers(&self) -> Vec<(AccountId, CreditAmount)> {
        self.transfers.lock().unwrap().clone()
    }
}

impl Default for NullCreditLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CreditLedger for NullCreditLedger {
    fn transfer(&self, to: &AccountId, amount: CreditAmount) -> Result<(), TransferError> {
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        let mut balances = self.balances.lock().unwrap();
        let entry = balances.entry(to.clone()).or_default();
        *entry = entry.checked_add(amount).ok_or(TransferError::Overflow)?;
        self.transfers.lock().unwrap().push((to.clone(), amount));
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> CreditAmount {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_transfers() {
        let ledger = NullCreditLedger::new();
        let alice = AccountId::new("alice");
        ledger.transfer(&alice, CreditAmount::new(5)).unwrap();
        ledger.transfer(&alice, CreditAmount::new(7)).unwrap();
        assert_eq!(ledger.balance_of(&alice), CreditAmount::new(12));
        assert_eq!(ledger.transfers().len(), 2);
    }

    #[test]
    fn injected_failure_until_cleared() {
        let ledger = NullCreditLedger::new();
        let alice = AccountId::new("alice");
        ledger.fail_with(TransferError::Rejected("test".into()));
        assert!(ledger.transfer(&alice, CreditAmount::new(1)).is_err());
        assert!(ledger.transfers().is_empty());

        ledger.succeed();
        assert!(ledger.transfer(&alice, CreditAmount::new(1)).is_ok());
        assert_eq!(ledger.balance_of(&alice), CreditAmount::new(1));
    }
}
