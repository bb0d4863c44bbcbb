use super::{client, endpoint, rejected, transport_error, DEFAULT_TIMEOUT};
use crate::error::DataError;
use async_trait::async_trait;
use pool_ledger_domain::value_objects::{Principal, TokenAmount};
use pool_ledger_engine::gateway::{GatewayError, TokenLedger};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Serialize)]
struct MintRequest<'a> {
    to: &'a Principal,
    amount: TokenAmount,
}

/// Token ledger reached over HTTP via `POST {base}/mint`.
#[derive(Debug, Clone)]
pub struct HttpTokenLedger {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTokenLedger {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DataError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        Ok(Self {
            base_url: base_url.into(),
            http: client(timeout)?,
        })
    }
}

#[async_trait]
impl TokenLedger for HttpTokenLedger {
    async fn mint(&self, to: &Principal, amount: TokenAmount) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(endpoint(&self.base_url, "mint"))
            .json(&MintRequest { to, amount })
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        info!(to = %to, amount = %amount, "Minted claim payout");
        Ok(())
    }
}
