//! Shared utilities for the Reclaim services.

pub mod logging;

pub use logging::{init_logging, LogFormat};
