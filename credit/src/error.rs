use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient treasury reserve: need {needed}, available {available}")]
    InsufficientReserve { needed: u128, available: u128 },

    #[error("invalid recipient")]
    InvalidRecipient,

    #[error("balance overflow for recipient")]
    Overflow,

    #[error("credit ledger unavailable: {0}")]
    Unavailable(String),

    #[error("transfer rejected: {0}")]
    Rejected(String),
}
