//! In-process credit ledger backed by a finite treasury reserve.

use std::collections::HashMap;
use std::sync::Mutex;

use reclaim_types::{AccountId, CreditAmount};
use tracing::debug;

use crate::error::TransferError;
use crate::ledger::CreditLedger;

struct Balances {
    reserve: CreditAmount,
    accounts: HashMap<AccountId, CreditAmount>,
}

/// A credit ledger that pays transfers out of a fixed reserve.
///
/// Transfers fail once the reserve is exhausted, which is what makes a
/// redemption roll back in a running service.
pub struct InMemoryCreditLedger {
    inner: Mutex<Balances>,
}

impl InMemoryCreditLedger {
    pub fn new(reserve: CreditAmount) -> Self {
        Self {
            inner: Mutex::new(Balances {
                reserve,
                accounts: HashMap::new(),
            }),
        }
    }

    /// Remaining treasury reserve.
    pub fn reserve(&self) -> CreditAmount {
        self.inner
            .lock()
            .map(|b| b.reserve)
            .unwrap_or(CreditAmount::ZERO)
    }
}

impl CreditLedger for InMemoryCreditLedger {
    fn transfer(&self, to: &AccountId, amount: CreditAmount) -> Result<(), TransferError> {
        if to.is_null() {
            return Err(TransferError::InvalidRecipient);
        }
        let mut balances = self
            .inner
            .lock()
            .map_err(|_| TransferError::Unavailable("balance lock poisoned".into()))?;

        let reserve = balances.reserve.checked_sub(amount).ok_or(
            TransferError::InsufficientReserve {
                needed: amount.raw(),
                available: balances.reserve.raw(),
            },
        )?;
        let current = balances.accounts.get(to).copied().unwrap_or_default();
        let credited = current.checked_add(amount).ok_or(TransferError::Overflow)?;

        balances.reserve = reserve;
        balances.accounts.insert(to.clone(), credited);
        debug!(to = %to, amount = amount.raw(), "credit transferred");
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> CreditAmount {
        self.inner
            .lock()
            .ok()
            .and_then(|b| b.accounts.get(account).copied())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_moves_reserve_to_recipient() {
        let ledger = InMemoryCreditLedger::new(CreditAmount::new(1_000));
        let alice = AccountId::new("alice");
        ledger.transfer(&alice, CreditAmount::new(300)).unwrap();
        assert_eq!(ledger.balance_of(&alice), CreditAmount::new(300));
        assert_eq!(ledger.reserve(), CreditAmount::new(700));
    }

    #[test]
    fn exhausted_reserve_rejects_without_side_effects() {
        let ledger = InMemoryCreditLedger::new(CreditAmount::new(100));
        let alice = AccountId::new("alice");
        let err = ledger.transfer(&alice, CreditAmount::new(101)).unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientReserve {
                needed: 101,
                available: 100
            }
        );
        assert_eq!(ledger.balance_of(&alice), CreditAmount::ZERO);
        assert_eq!(ledger.reserve(), CreditAmount::new(100));
    }

    #[test]
    fn null_recipient_rejected() {
        let ledger = InMemoryCreditLedger::new(CreditAmount::new(100));
        assert_eq!(
            ledger.transfer(&AccountId::new(""), CreditAmount::new(1)),
            Err(TransferError::InvalidRecipient)
        );
    }

    #[test]
    fn unknown_account_has_zero_balance() {
        let ledger = InMemoryCreditLedger::new(CreditAmount::ZERO);
        assert!(ledger.balance_of(&AccountId::new("nobody")).is_zero());
    }
}
