//! Fungible credit ledger used to pay out redemptions.
//!
//! The reward ledger only needs `transfer` and `balance_of`; anything that
//! can move fungible credit (an on-chain token, a payments service, the
//! in-process [`InMemoryCreditLedger`]) can sit behind [`CreditLedger`].

pub mod error;
pub mod ledger;
pub mod memory;

pub use error::TransferError;
pub use ledger::CreditLedger;
pub use memory::InMemoryCreditLedger;
