use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("caller {0} is not authorized for this operation")]
    Unauthorized(String),

    #[error("invalid target identity")]
    InvalidTarget,

    #[error("{0} is not an admin")]
    NotAnAdmin(String),

    #[error("admin registry lock poisoned")]
    Poisoned,
}
