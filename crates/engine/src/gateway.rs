//! Collaborating services consumed by the ledger.
//!
//! Governance owns proposals and their lifecycle; the token ledger moves funds
//! for payouts that do not land in a deposit. In-memory implementations back
//! tests and standalone runs.

use async_trait::async_trait;
use pool_ledger_domain::entities::Proposal;
use pool_ledger_domain::enums::ProposalStatus;
use pool_ledger_domain::value_objects::{Principal, ProposalId, TokenAmount};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Failure reported by a collaborating service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Service could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    /// Service refused the request.
    #[error("collaborator rejected request: {0}")]
    Rejected(String),
}

/// Governance proposal source.
#[async_trait]
pub trait GovernanceGateway: Send + Sync {
    /// Fetches a proposal, `None` if it does not exist.
    async fn proposal(&self, id: ProposalId) -> Result<Option<Proposal>, GatewayError>;

    /// Marks a proposal's claim as paid out.
    async fn mark_claimed(&self, id: ProposalId) -> Result<(), GatewayError>;
}

/// Token ledger used for payouts routed outside the pool.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Credits `amount` to `to`.
    async fn mint(&self, to: &Principal, amount: TokenAmount) -> Result<(), GatewayError>;
}

/// Proposal table held in memory.
#[derive(Debug, Default)]
pub struct InMemoryGovernance {
    proposals: RwLock<HashMap<ProposalId, Proposal>>,
}

impl InMemoryGovernance {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a proposal.
    pub async fn upsert(&self, proposal: Proposal) {
        self.proposals.write().await.insert(proposal.id, proposal);
    }

    /// Reads a proposal.
    pub async fn get(&self, id: ProposalId) -> Option<Proposal> {
        self.proposals.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl GovernanceGateway for InMemoryGovernance {
    async fn proposal(&self, id: ProposalId) -> Result<Option<Proposal>, GatewayError> {
        Ok(self.get(id).await)
    }

    async fn mark_claimed(&self, id: ProposalId) -> Result<(), GatewayError> {
        let mut proposals = self.proposals.write().await;
        let proposal = proposals
            .get_mut(&id)
            .ok_or_else(|| GatewayError::Rejected(format!("unknown proposal {}", id)))?;
        proposal.status = ProposalStatus::Claimed;
        proposal.executed = true;
        debug!(proposal_id = %id, "Proposal marked claimed");
        Ok(())
    }
}

/// Balance table held in memory.
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    balances: RwLock<HashMap<Principal, TokenAmount>>,
    unavailable: AtomicBool,
}

impl InMemoryTokenLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `who`.
    pub async fn balance_of(&self, who: &Principal) -> TokenAmount {
        self.balances
            .read()
            .await
            .get(who)
            .copied()
            .unwrap_or_default()
    }

    /// Simulates an outage: while set, every mint fails.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl TokenLedger for InMemoryTokenLedger {
    async fn mint(&self, to: &Principal, amount: TokenAmount) -> Result<(), GatewayError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("token ledger offline".to_string()));
        }
        let mut balances = self.balances.write().await;
        let balance = balances.entry(to.clone()).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| GatewayError::Rejected("balance overflow".to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_ledger_domain::entities::ProposalParams;
    use pool_ledger_domain::enums::RiskType;
    use pool_ledger_domain::value_objects::{CoverId, PoolId};

    #[tokio::test]
    async fn test_in_memory_governance_marks_claimed() {
        let governance = InMemoryGovernance::new();
        governance
            .upsert(Proposal {
                id: ProposalId(1),
                status: ProposalStatus::Approved,
                executed: false,
                params: ProposalParams {
                    user: Principal::from("claimant"),
                    pool_id: PoolId(0),
                    cover_id: CoverId(0),
                    claim_amount: TokenAmount::from(10u64),
                    risk_type: RiskType::Protocol,
                    description: String::new(),
                    tx_hash: String::new(),
                },
            })
            .await;

        governance.mark_claimed(ProposalId(1)).await.unwrap();
        let proposal = governance.get(ProposalId(1)).await.unwrap();
        assert_eq!(proposal.status, ProposalStatus::Claimed);
        assert!(proposal.executed);
        assert!(governance.mark_claimed(ProposalId(2)).await.is_err());
    }

    #[tokio::test]
    async fn test_in_memory_token_ledger() {
        let ledger = InMemoryTokenLedger::new();
        let who = Principal::from("bob");
        ledger.mint(&who, TokenAmount::from(5u64)).await.unwrap();
        ledger.mint(&who, TokenAmount::from(7u64)).await.unwrap();
        assert_eq!(ledger.balance_of(&who).await, TokenAmount::from(12u64));

        ledger.set_unavailable(true);
        assert!(ledger.mint(&who, TokenAmount::from(1u64)).await.is_err());
        assert_eq!(ledger.balance_of(&who).await, TokenAmount::from(12u64));
    }
}
