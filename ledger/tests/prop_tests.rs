use std::sync::Arc;

use proptest::prelude::*;

use reclaim_access::AdminRegistry;
use reclaim_credit::{CreditLedger, TransferError};
use reclaim_ledger::{LedgerError, RewardLedger};
use reclaim_nullables::NullCreditLedger;
use reclaim_types::{AccountId, LedgerParams};

#[derive(Clone, Debug)]
enum Op {
    Submit(u64),
    Verify(usize),
    Redeem,
    FailingRedeem,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..40).prop_map(Op::Submit),
        (0usize..30).prop_map(Op::Verify),
        Just(Op::Redeem),
        Just(Op::FailingRedeem),
    ]
}

fn setup(rate: u64) -> (RewardLedger, Arc<NullCreditLedger>) {
    let credit = Arc::new(NullCreditLedger::new());
    let ledger = RewardLedger::new(
        LedgerParams::new(rate, 0).unwrap(),
        AdminRegistry::new(AccountId::new("owner")),
        Arc::clone(&credit) as Arc<dyn CreditLedger>,
    )
    .unwrap();
    ledger.register(&AccountId::new("alice"), "Alice").unwrap();
    (ledger, credit)
}

proptest! {
    /// Counters stay ordered and consistent with the submission list under any
    /// sequence of operations, including failed transfers.
    #[test]
    fn counters_always_ordered(rate in 1u64..20, ops in prop::collection::vec(op_strategy(), 1..60)) {
        let (ledger, credit) = setup(rate);
        let alice = AccountId::new("alice");
        let owner = AccountId::new("owner");

        for op in ops {
            let before = ledger.profile(&alice).unwrap();
            match op {
                Op::Submit(q) => {
                    let result = ledger.submit(&alice, q);
                    if q == 0 {
                        prop_assert_eq!(result, Err(LedgerError::InvalidQuantity));
                    }
                }
                Op::Verify(i) => { let _ = ledger.verify(&owner, &alice, i); }
                Op::Redeem => { let _ = ledger.redeem(&alice); }
                Op::FailingRedeem => {
                    credit.fail_with(TransferError::Unavailable("down".into()));
                    let result = ledger.redeem(&alice);
                    credit.succeed();
                    let after = ledger.profile(&alice).unwrap();
                    prop_assert!(result.is_err());
                    prop_assert_eq!(after.total_redeemed, before.total_redeemed);
                    prop_assert_eq!(after.credit_balance, before.credit_balance);
                }
            }
            let after = ledger.profile(&alice).unwrap();
            prop_assert!(after.counters_ordered());
            prop_assert!(after.total_submitted >= before.total_submitted);
            prop_assert!(after.total_verified >= before.total_verified);
            prop_assert!(after.total_redeemed >= before.total_redeemed);

            let submissions = ledger.submissions(&alice).unwrap();
            let submitted: u64 = submissions.iter().map(|s| s.quantity).sum();
            let verified: u64 = submissions
                .iter()
                .filter(|s| s.status.is_verified())
                .map(|s| s.quantity)
                .sum();
            prop_assert_eq!(submitted, after.total_submitted);
            prop_assert_eq!(verified, after.total_verified);
        }

        let profile = ledger.profile(&alice).unwrap();
        let paid: u128 = credit.transfers().iter().map(|(_, a)| a.raw()).sum();
        prop_assert_eq!(paid, profile.credit_balance);
        prop_assert_eq!(profile.credit_balance * rate as u128, profile.total_redeemed as u128);
    }

    /// A redeem converts exactly `verified / rate` units and leaves `verified % rate`.
    #[test]
    fn redeem_truncates_and_keeps_remainder(rate in 1u64..50, verified in 1u64..10_000) {
        let (ledger, _) = setup(rate);
        let alice = AccountId::new("alice");
        ledger.submit(&alice, verified).unwrap();
        ledger.verify(&AccountId::new("owner"), &alice, 0).unwrap();

        match ledger.redeem(&alice) {
            Ok(receipt) => {
                prop_assert!(verified >= rate);
                prop_assert_eq!(receipt.units, verified / rate);
                prop_assert_eq!(receipt.remainder, verified % rate);
                prop_assert_eq!(ledger.redeemable(&alice).unwrap(), verified % rate);
            }
            Err(e) => {
                prop_assert!(verified < rate);
                prop_assert_eq!(
                    e,
                    LedgerError::InsufficientQuantity { redeemable: verified, required: rate }
                );
            }
        }
    }
}
