//! Parameter validation errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("exchange rate must be non-zero")]
    ZeroExchangeRate,

    #[error("credit decimals {0} overflow the credit amount range")]
    DecimalsOverflow(u32),
}
