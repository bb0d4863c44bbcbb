use crate::enums::{ProposalStatus, RiskType};
use crate::value_objects::{CoverId, PoolId, Principal, ProposalId, TokenAmount};
use serde::{Deserialize, Serialize};

/// Claim request voted on by governance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalParams {
    /// Claimant receiving the payout.
    pub user: Principal,
    pub pool_id: PoolId,
    pub cover_id: CoverId,
    pub claim_amount: TokenAmount,
    pub risk_type: RiskType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub status: ProposalStatus,
    pub executed: bool,
    pub params: ProposalParams,
}
