use super::{client, endpoint, rejected, transport_error, DEFAULT_TIMEOUT};
use crate::error::DataError;
use async_trait::async_trait;
use pool_ledger_domain::entities::Proposal;
use pool_ledger_domain::value_objects::ProposalId;
use pool_ledger_engine::gateway::{GatewayError, GovernanceGateway};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Governance service reached over HTTP.
///
/// `GET {base}/proposals/{id}` returns the proposal or 404.
/// `POST {base}/proposals/{id}/claimed` marks it paid.
#[derive(Debug, Clone)]
pub struct HttpGovernanceGateway {
    base_url: String,
    http: reqwest::Client,
}

impl HttpGovernanceGateway {
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
impl GovernanceGateway for HttpGovernanceGateway {
    async fn proposal(&self, id: ProposalId) -> Result<Option<Proposal>, GatewayError> {
        let url = endpoint(&self.base_url, &format!("proposals/{}", id));
        debug!(url = %url, "Fetching proposal");
        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<Proposal>()
                .await
                .map(Some)
                .map_err(|err| GatewayError::Rejected(format!("malformed proposal: {}", err))),
            _ => Err(rejected(response).await),
        }
    }

    async fn mark_claimed(&self, id: ProposalId) -> Result<(), GatewayError> {
        let url = endpoint(&self.base_url, &format!("proposals/{}/claimed", id));
        let response = self.http.post(&url).send().await.map_err(transport_error)?;
        if response.status().is_success() {
            debug!(proposal_id = %id, "Governance acknowledged claim");
            Ok(())
        } else {
            Err(rejected(response).await)
        }
    }
}
