//! API error responses.

use crate::auth::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pool_ledger_engine::LedgerError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Request was not authenticated.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Request was malformed.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ledger(err) => ledger_status(err),
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.kind(),
            Self::Auth(_) => "unauthenticated",
            Self::BadRequest(_) => "bad_request",
        }
    }
}

fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::NotFound(_) | LedgerError::NoDeposit(_) => StatusCode::NOT_FOUND,
        LedgerError::InvalidAmount | LedgerError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        LedgerError::Unauthorized => StatusCode::FORBIDDEN,
        LedgerError::PoolInactive(_)
        | LedgerError::DepositClosed(_)
        | LedgerError::ProposalNotApproved(_) => StatusCode::CONFLICT,
        LedgerError::InsufficientFunds { .. }
        | LedgerError::InsufficientPoolFunds { .. }
        | LedgerError::OutOfBounds { .. }
        | LedgerError::Overflow => StatusCode::UNPROCESSABLE_ENTITY,
        LedgerError::Gateway(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Auth(auth) = self {
            return auth.into_response();
        }
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
