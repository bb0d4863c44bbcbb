//! API request and response models.

use pool_ledger_domain::entities::Pool;
use pool_ledger_domain::enums::RiskType;
use pool_ledger_domain::value_objects::{PoolId, Principal, ProposalId, TokenAmount};
use pool_ledger_engine::claims::ClaimOutcome;
use serde::{Deserialize, Serialize};

/// Request to create a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolRequest {
    /// Risk classification.
    pub risk_type: RiskType,
    /// Display name.
    pub pool_name: String,
    /// APY in percent.
    pub apy: u64,
    /// Minimum commitment in days.
    pub min_period: u64,
}

/// Request to change pool parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePoolRequest {
    /// New APY in percent.
    pub apy: u64,
    /// New minimum commitment in days.
    pub min_period: u64,
}

/// Deposit or withdrawal amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    /// Token amount.
    pub amount: TokenAmount,
}

/// Split delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    /// Percentage points to move.
    pub delta: u64,
}

/// New owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRequest {
    /// Principal taking ownership.
    pub owner: Principal,
}

/// Collaborator identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorsRequest {
    /// Cover service principal.
    #[serde(default)]
    pub cover_service: Option<Principal>,
    /// Governance principal.
    #[serde(default)]
    pub governance: Option<Principal>,
}

/// Newly created pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolResponse {
    /// Assigned id.
    pub pool_id: PoolId,
}

/// One pool in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolListItem {
    /// Pool id.
    pub pool_id: PoolId,
    /// Pool record.
    pub pool: Pool,
}

/// Pool tvl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvlResponse {
    /// Pool id.
    pub pool_id: PoolId,
    /// Total value locked.
    pub tvl: TokenAmount,
}

/// Pool activity flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolActiveResponse {
    /// Pool id.
    pub pool_id: PoolId,
    /// Whether deposits are accepted.
    pub is_active: bool,
}

/// Split after a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitResponse {
    /// Pool id.
    pub pool_id: PoolId,
    /// Current split.
    pub percentage_split_balance: u8,
}

/// Accrual settlement result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualResponse {
    /// Amount credited.
    pub credited: TokenAmount,
}

/// Claimable days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimableDaysResponse {
    /// Whole days not yet credited.
    pub days: u64,
}

/// Last settlement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastClaimTimeResponse {
    /// Unix seconds.
    pub last_claim_time: u64,
}

/// Cross-pool participation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipationResponse {
    /// Depositor.
    pub principal: Principal,
    /// Sum of deposit amounts.
    pub total: TokenAmount,
}

/// Claim result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    /// Proposal.
    pub proposal_id: ProposalId,
    /// What happened.
    pub outcome: ClaimOutcome,
}

/// Health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Number of pools.
    pub pools: usize,
}
