//! Axum-based RPC server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use reclaim_ledger::RewardLedger;
use tracing::info;

use crate::error::RpcError;
use crate::handlers;
use crate::metrics::RpcMetrics;

/// Shared state handed to every handler.
pub struct AppState {
    pub ledger: Arc<RewardLedger>,
    pub metrics: Arc<RpcMetrics>,
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/accounts", post(handlers::register))
        .route("/accounts/:account", get(handlers::get_account))
        .route("/accounts/:account/submissions", get(handlers::list_submissions))
        .route(
            "/accounts/:account/submissions/:index/verify",
            post(handlers::verify),
        )
        .route("/submissions", post(handlers::submit))
        .route("/redeem", post(handlers::redeem))
        .route("/leaderboard", get(handlers::leaderboard))
        .route("/admins", get(handlers::list_admins).post(handlers::add_admin))
        .route("/admins/:target", delete(handlers::remove_admin))
        .route("/credit/:account", get(handlers::credit_balance))
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health))
        .with_state(state)
}

pub struct RpcServer {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, ledger: Arc<RewardLedger>, metrics: Arc<RpcMetrics>) -> Self {
        Self {
            addr,
            state: Arc::new(AppState { ledger, metrics }),
        }
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(count) = self.state.ledger.account_count() {
            self.state.metrics.accounts.set(count as i64);
        }
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {}: {e}", self.addr)))?;
        info!(addr = %self.addr, "RPC server listening");
        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
