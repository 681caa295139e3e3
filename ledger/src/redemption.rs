//! Redemption engine: convert verified quantity into external credit.
//!
//! `units = (total_verified - total_redeemed) / exchange_rate`
//!
//! Only `units * exchange_rate` is marked redeemed; the remainder stays
//! pending for a later call. The counter increases are applied before the
//! external transfer and reverted if the transfer fails, so credit on the
//! profile and credit on the external ledger always move together.

use reclaim_credit::CreditLedger;
use reclaim_types::{AccountId, CreditAmount, LedgerParams, SubmissionStatus};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::LedgerError;
use crate::profile::{AccountRecord, Profile};

/// What a redemption would do, computed without mutating anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedemptionPlan {
    /// Verified quantity awaiting conversion.
    pub redeemable: u64,
    /// Whole credit units to grant.
    pub units: u64,
    /// `units * exchange_rate`.
    pub quantity_consumed: u64,
    /// Quantity left pending after this redemption.
    pub remainder: u64,
    /// `units` scaled to the external ledger's denomination.
    pub amount: CreditAmount,
}

/// Receipt of a completed redemption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Redemption {
    pub identity: AccountId,
    pub units: u64,
    pub quantity_consumed: u64,
    pub remainder: u64,
    pub transferred: CreditAmount,
    /// Number of submissions advanced from Verified to Redeemed.
    pub submissions_redeemed: usize,
}

pub struct RedemptionEngine {
    params: LedgerParams,
}

impl RedemptionEngine {
    pub fn new(params: LedgerParams) -> Result<Self, LedgerError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    /// Compute the redemption for `profile`, failing if less than one
    /// credit unit is available.
    pub fn plan(&self, profile: &Profile) -> Result<RedemptionPlan, LedgerError> {
        let rate = self.params.exchange_rate;
        let redeemable = profile.redeemable();
        if redeemable < rate {
            return Err(LedgerError::InsufficientQuantity {
                redeemable,
                required: rate,
            });
        }
        let units = redeemable / rate;
        let quantity_consumed = units * rate;
        let amount = self
            .params
            .scale_units(units)
            .ok_or(LedgerError::Overflow)?;
        Ok(RedemptionPlan {
            redeemable,
            units,
            quantity_consumed,
            remainder: redeemable - quantity_consumed,
            amount,
        })
    }

    /// Redeem all whole credit units available to `record`.
    ///
    /// On transfer failure the record is left exactly as it was found.
    pub fn redeem(
        &self,
        record: &mut AccountRecord,
        credit: &dyn CreditLedger,
    ) -> Result<Redemption, LedgerError> {
        let plan = self.plan(&record.profile)?;
        let profile = &mut record.profile;

        let total_redeemed = profile
            .total_redeemed
            .checked_add(plan.quantity_consumed)
            .ok_or(LedgerError::Overflow)?;
        let credit_balance = profile
            .credit_balance
            .checked_add(plan.units as u128)
            .ok_or(LedgerError::Overflow)?;

        let prior = (profile.total_redeemed, profile.credit_balance);
        profile.total_redeemed = total_redeemed;
        profile.credit_balance = credit_balance;

        if let Err(e) = credit.transfer(&profile.identity, plan.amount) {
            (profile.total_redeemed, profile.credit_balance) = prior;
            warn!(
                account = %profile.identity,
                units = plan.units,
                error = %e,
                "credit transfer failed, redemption rolled back"
            );
            return Err(LedgerError::TransferFailed(e));
        }

        // Every verified submission is advanced, including ones whose quantity
        // is still part of the remainder.
        let mut submissions_redeemed = 0;
        for submission in &mut record.submissions {
            if submission.status.can_advance_to(SubmissionStatus::Redeemed) {
                submission.status = SubmissionStatus::Redeemed;
                submissions_redeemed += 1;
            }
        }

        info!(
            account = %record.profile.identity,
            units = plan.units,
            remainder = plan.remainder,
            "redemption completed"
        );
        Ok(Redemption {
            identity: record.profile.identity.clone(),
            units: plan.units,
            quantity_consumed: plan.quantity_consumed,
            remainder: plan.remainder,
            transferred: plan.amount,
            submissions_redeemed,
        })
    }
}
