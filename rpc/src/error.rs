//! RPC error types and their HTTP mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reclaim_ledger::LedgerError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("missing x-caller header")]
    MissingCaller,

    #[error("submission index {0} out of range")]
    NegativeIndex(i64),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for RpcError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl RpcError {
    /// Machine-readable error kind, shared with [`LedgerError::kind`].
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.kind(),
            Self::MissingCaller => "unauthorized",
            Self::NegativeIndex(_) => "invalid_index",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Server(_) => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ledger(e) => match e {
                LedgerError::NotRegistered(_) => StatusCode::NOT_FOUND,
                LedgerError::Unauthorized(_) => StatusCode::FORBIDDEN,
                LedgerError::AlreadyRegistered(_) | LedgerError::AlreadyVerified(_) => {
                    StatusCode::CONFLICT
                }
                LedgerError::TransferFailed(_) => StatusCode::BAD_GATEWAY,
                LedgerError::InvalidQuantity
                | LedgerError::InvalidIndex { .. }
                | LedgerError::InsufficientQuantity { .. }
                | LedgerError::InvalidCount { .. }
                | LedgerError::InvalidTarget
                | LedgerError::NotAnAdmin(_)
                | LedgerError::InvalidParams(_) => StatusCode::BAD_REQUEST,
                LedgerError::Overflow | LedgerError::Poisoned => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::MissingCaller => StatusCode::UNAUTHORIZED,
            Self::NegativeIndex(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_types::ParamsError;

    #[test]
    fn every_ledger_kind_maps_to_a_status() {
        let cases = [
            (LedgerError::AlreadyRegistered("a".into()), StatusCode::CONFLICT),
            (LedgerError::NotRegistered("a".into()), StatusCode::NOT_FOUND),
            (LedgerError::InvalidQuantity, StatusCode::BAD_REQUEST),
            (LedgerError::Unauthorized("a".into()), StatusCode::FORBIDDEN),
            (LedgerError::InvalidIndex { index: 3, len: 1 }, StatusCode::BAD_REQUEST),
            (LedgerError::AlreadyVerified(0), StatusCode::CONFLICT),
            (
                LedgerError::InsufficientQuantity { redeemable: 1, required: 10 },
                StatusCode::BAD_REQUEST,
            ),
            (
                LedgerError::InvalidCount { requested: -1, available: 0 },
                StatusCode::BAD_REQUEST,
            ),
            (LedgerError::InvalidTarget, StatusCode::BAD_REQUEST),
            (LedgerError::NotAnAdmin("a".into()), StatusCode::BAD_REQUEST),
            (
                LedgerError::InvalidParams(ParamsError::ZeroExchangeRate),
                StatusCode::BAD_REQUEST,
            ),
            (LedgerError::Overflow, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(RpcError::from(err).status(), status);
        }
    }

    #[test]
    fn missing_caller_is_unauthorized_kind() {
        assert_eq!(RpcError::MissingCaller.kind(), "unauthorized");
        assert_eq!(RpcError::MissingCaller.status(), StatusCode::UNAUTHORIZED);
    }
}
