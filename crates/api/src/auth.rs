//! API key authentication.
//!
//! Every key maps to exactly one principal. The principal behind a valid key
//! becomes the [`CallContext`] of the request; request bodies never name the
//! caller.

use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use pool_ledger_domain::value_objects::Principal;
use pool_ledger_engine::access::CallContext;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Authentication configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// API key to principal.
    pub api_keys: HashMap<String, Principal>,
}

impl AuthConfig {
    /// Parses a comma separated `key=principal` list.
    ///
    /// # Errors
    /// Returns [`AuthError::MalformedKeyList`] if an item has no `=` or an
    /// empty side.
    pub fn from_key_list(list: &str) -> Result<Self, AuthError> {
        let mut api_keys = HashMap::new();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, principal) = item
                .split_once('=')
                .map(|(k, p)| (k.trim(), p.trim()))
                .filter(|(k, p)| !k.is_empty() && !p.is_empty())
                .ok_or_else(|| AuthError::MalformedKeyList(item.to_string()))?;
            api_keys.insert(key.to_string(), Principal::from(principal));
        }
        Ok(Self { api_keys })
    }

    /// Adds one key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>, principal: Principal) -> Self {
        self.api_keys.insert(key.into(), principal);
        self
    }
}

/// Authentication state shared across handlers.
#[derive(Debug, Clone)]
pub struct AuthState {
    config: Arc<AuthConfig>,
}

impl AuthState {
    /// Creates a new authentication state.
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Principal behind an API key.
    #[must_use]
    pub fn principal_for(&self, key: &str) -> Option<&Principal> {
        self.config.api_keys.get(key)
    }

    /// Number of configured keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.config.api_keys.len()
    }
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Missing authentication header.
    #[error("Missing authentication")]
    MissingAuth,
    /// Invalid API key.
    #[error("Invalid API key")]
    InvalidApiKey,
    /// Unparseable key configuration.
    #[error("Malformed API key entry: {0}")]
    MalformedKeyList(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingAuth => StatusCode::UNAUTHORIZED,
            Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::MalformedKeyList(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": "unauthenticated",
            "code": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Extracts the presented API key from request headers.
///
/// Accepts `X-API-Key: <key>` or `Authorization: Bearer <key>`.
pub fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(api_key) = headers.get("X-API-Key")
        && let Ok(key) = api_key.to_str()
    {
        return Some(key);
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token);
    }

    None
}

/// Authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct Caller(pub CallContext);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let key = extract_api_key(&parts.headers).ok_or_else(|| {
            debug!(path = %parts.uri.path(), "No credentials provided");
            AuthError::MissingAuth
        })?;
        let principal = state.auth.principal_for(key).ok_or_else(|| {
            warn!(path = %parts.uri.path(), "Unknown API key");
            AuthError::InvalidApiKey
        })?;
        Ok(Self(CallContext::authenticated(principal.clone())))
    }
}
