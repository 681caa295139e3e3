//! Ledger parameters: the exchange rate and the external credit denomination.

use crate::amount::CreditAmount;
use crate::error::ParamsError;
use serde::{Deserialize, Serialize};

/// Default quantity units required for one credit unit.
pub const DEFAULT_EXCHANGE_RATE: u64 = 10;

/// Default number of decimals used by the external credit ledger.
pub const DEFAULT_CREDIT_DECIMALS: u32 = 18;

/// Fixed parameters of a reward ledger instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Quantity units converted into one credit unit.
    pub exchange_rate: u64,

    /// Decimals of the external credit ledger; one credit unit is
    /// `10^credit_decimals` base units.
    pub credit_decimals: u32,
}

impl LedgerParams {
    /// Build and validate a parameter set.
    pub fn new(exchange_rate: u64, credit_decimals: u32) -> Result<Self, ParamsError> {
        let params = Self {
            exchange_rate,
            credit_decimals,
        };
        params.validate()?;
        Ok(params)
    }

    /// Reject parameter sets the redemption arithmetic cannot work with.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.exchange_rate == 0 {
            return Err(ParamsError::ZeroExchangeRate);
        }
        self.denomination()?;
        Ok(())
    }

    /// Base units of the external ledger per credit unit.
    pub fn denomination(&self) -> Result<u128, ParamsError> {
        10u128
            .checked_pow(self.credit_decimals)
            .ok_or(ParamsError::DecimalsOverflow(self.credit_decimals))
    }

    /// Scale whole credit units into the external ledger's denomination.
    ///
    /// Returns `None` on overflow.
    pub fn scale_units(&self, units: u64) -> Option<CreditAmount> {
        let denomination = self.denomination().ok()?;
        (units as u128).checked_mul(denomination).map(CreditAmount::new)
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            credit_decimals: DEFAULT_CREDIT_DECIMALS,
        }
    }
}
