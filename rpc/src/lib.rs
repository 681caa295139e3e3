//! HTTP/JSON API for the Reclaim reward ledger.
//!
//! Provides endpoints for:
//! - Registration and profile lookup
//! - Submitting quantities and listing an account's submissions
//! - Verification by owner/admins
//! - Redemption into external credit
//! - The leaderboard
//! - Admin management (owner only)
//! - Prometheus metrics
//!
//! The caller's identity is taken from the `x-caller` header; authenticating
//! that header is the job of whatever sits in front of this server.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use error::RpcError;
pub use metrics::RpcMetrics;
pub use server::{router, AppState, RpcServer};
