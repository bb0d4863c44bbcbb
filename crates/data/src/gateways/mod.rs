//! HTTP clients for the ledger's collaborating services.

mod governance;
mod token_ledger;

pub use governance::HttpGovernanceGateway;
pub use token_ledger::HttpTokenLedger;

use crate::error::DataError;
use pool_ledger_engine::gateway::GatewayError;
use std::time::Duration;

/// Request timeout applied to every collaborator call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn client(timeout: Duration) -> Result<reqwest::Client, DataError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Unavailable(err.to_string())
}

async fn rejected(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    GatewayError::Rejected(format!("{}: {}", status, body.trim()))
}
