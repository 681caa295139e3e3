//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (e.g. forced to fail)
//! - Record every call for later assertions
//!
//! Usage: swap real implementations for nullables in tests.

pub mod credit;

pub use credit::NullCreditLedger;
