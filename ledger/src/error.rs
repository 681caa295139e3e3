use reclaim_access::AccessError;
use reclaim_credit::TransferError;
use reclaim_types::ParamsError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("account {0} is already registered")]
    AlreadyRegistered(String),

    #[error("account {0} is not registered")]
    NotRegistered(String),

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("caller {0} is not authorized for this operation")]
    Unauthorized(String),

    #[error("submission index {index} out of range (account has {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("submission {0} is not pending")]
    AlreadyVerified(usize),

    #[error("insufficient verified quantity: have {redeemable}, need {required}")]
    InsufficientQuantity { redeemable: u64, required: u64 },

    #[error("credit transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("invalid leaderboard count {requested} ({available} accounts registered)")]
    InvalidCount { requested: i64, available: usize },

    #[error("invalid target identity")]
    InvalidTarget,

    #[error("{0} is not an admin")]
    NotAnAdmin(String),

    #[error("invalid ledger parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    #[error("arithmetic overflow in ledger counters")]
    Overflow,

    #[error("ledger lock poisoned")]
    Poisoned,
}

impl LedgerError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered(_) => "already_registered",
            Self::NotRegistered(_) => "not_registered",
            Self::InvalidQuantity => "invalid_quantity",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidIndex { .. } => "invalid_index",
            Self::AlreadyVerified(_) => "already_verified",
            Self::InsufficientQuantity { .. } => "insufficient_quantity",
            Self::TransferFailed(_) => "transfer_failed",
            Self::InvalidCount { .. } => "invalid_count",
            Self::InvalidTarget => "invalid_target",
            Self::NotAnAdmin(_) => "not_an_admin",
            Self::InvalidParams(_) => "invalid_params",
            Self::Overflow => "overflow",
            Self::Poisoned => "poisoned",
        }
    }
}

impl From<AccessError> for LedgerError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Unauthorized(caller) => Self::Unauthorized(caller),
            AccessError::InvalidTarget => Self::InvalidTarget,
            AccessError::NotAnAdmin(target) => Self::NotAnAdmin(target),
            AccessError::Poisoned => Self::Poisoned,
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot hash does not match its contents")]
    HashMismatch,

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("account {0} appears more than once")]
    DuplicateAccount(String),

    #[error("account {0} violates the counter invariants")]
    InconsistentAccount(String),

    #[error("snapshot encoding failed: {0}")]
    Encode(String),

    #[error("snapshot decoding failed: {0}")]
    Decode(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
