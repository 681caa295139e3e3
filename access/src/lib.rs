//! Access gate for the Reclaim ledger.
//!
//! Distinguishes a single owner, a set of admins, and regular callers.
//! The ledger only consumes the capability checks of [`AccessGate`];
//! admin-set management is exposed to the administrative surface.
//!
//! The owner is always privileged, but is never stored in the admin set, so
//! removing admins can never strip the owner's privilege.

pub mod error;
pub mod gate;

pub use error::AccessError;
pub use gate::{is_privileged, AccessGate, AdminRegistry};
