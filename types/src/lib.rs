//! Fundamental types for the Reclaim reward ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identities, credit amounts, submission states, and ledger parameters.

pub mod account;
pub mod amount;
pub mod error;
pub mod params;
pub mod state;

pub use account::AccountId;
pub use amount::CreditAmount;
pub use error::ParamsError;
pub use params::LedgerParams;
pub use state::SubmissionStatus;
