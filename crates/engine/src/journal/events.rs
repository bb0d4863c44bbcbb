//! Journal events.

use pool_ledger_domain::enums::RiskType;
use pool_ledger_domain::value_objects::{CoverId, PoolId, Principal, ProposalId, TokenAmount};
use serde::{Deserialize, Serialize};

/// Type of ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEventType {
    /// Pool was created.
    PoolCreated,
    /// Pool rate or period changed.
    PoolUpdated,
    /// Pool stopped accepting deposits.
    PoolDeactivated,
    /// Funds were deposited.
    Deposited,
    /// Funds were withdrawn.
    Withdrawn,
    /// Daily payouts were credited.
    AccrualSettled,
    /// Percentage split moved.
    SplitChanged,
    /// Cover was attached or replaced.
    CoverChanged,
    /// Approved claim was paid.
    ClaimSettled,
}

/// A journal entry for a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Event ID.
    pub id: String,
    /// Event type.
    pub event_type: LedgerEventType,
    /// Pool the event belongs to.
    pub pool_id: PoolId,
    /// Ledger time of the event.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Event-specific data.
    pub data: EventData,
}

impl LedgerEvent {
    /// Creates a new event stamped with ledger time `at` (Unix seconds).
    pub fn new(event_type: LedgerEventType, pool_id: PoolId, at: u64, data: EventData) -> Self {
        let timestamp = i64::try_from(at)
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .unwrap_or_default();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            pool_id,
            timestamp,
            data,
        }
    }
}

/// Event-specific data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventData {
    /// Pool created.
    PoolCreated(PoolCreatedData),
    /// Pool parameters changed.
    PoolUpdated(PoolUpdatedData),
    /// Pool deactivated.
    PoolDeactivated,
    /// Deposit or top-up.
    Deposit(DepositData),
    /// Withdrawal.
    Withdrawal(WithdrawalData),
    /// Accrual credited.
    Accrual(AccrualData),
    /// Split moved.
    Split(SplitData),
    /// Cover attached or replaced.
    Cover(CoverData),
    /// Claim paid.
    Claim(ClaimData),
}

/// Data for pool created event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolCreatedData {
    /// Pool name.
    pub pool_name: String,
    /// Risk classification.
    pub risk_type: RiskType,
    /// APY in percent.
    pub apy: u64,
    /// Minimum period in days.
    pub min_period: u64,
}

/// Data for pool updated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolUpdatedData {
    /// APY before.
    pub old_apy: u64,
    /// APY after.
    pub new_apy: u64,
    /// Minimum period before.
    pub old_min_period: u64,
    /// Minimum period after.
    pub new_min_period: u64,
    /// Deposits settled at the old rate.
    pub settled_deposits: usize,
}

/// Data for deposit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositData {
    /// Depositor.
    pub lp: Principal,
    /// Amount added.
    pub amount: TokenAmount,
    /// Whether an existing deposit was topped up.
    pub top_up: bool,
    /// Pool tvl after the deposit.
    pub new_tvl: TokenAmount,
}

/// Data for withdrawal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalData {
    /// Depositor.
    pub lp: Principal,
    /// Portion drawn from accrued payout.
    pub from_accrued: TokenAmount,
    /// Portion drawn from principal.
    pub from_principal: TokenAmount,
    /// Whether the deposit is now closed.
    pub closed: bool,
    /// Pool tvl after the withdrawal.
    pub new_tvl: TokenAmount,
}

/// Data for accrual event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualData {
    /// Depositor.
    pub lp: Principal,
    /// Whole days credited.
    pub days: u64,
    /// Amount credited.
    pub credited: TokenAmount,
}

/// Data for split event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitData {
    /// Split before.
    pub old_split: u8,
    /// Split after.
    pub new_split: u8,
}

/// Data for cover event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverData {
    /// Cover.
    pub cover_id: CoverId,
    /// Capacity committed by the cover.
    pub capacity_amount: TokenAmount,
    /// Whether an existing cover was replaced.
    pub replaced: bool,
}

/// Data for claim event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimData {
    /// Proposal paid.
    pub proposal_id: ProposalId,
    /// Claimant.
    pub claimant: Principal,
    /// Amount paid.
    pub amount: TokenAmount,
    /// Whether the payout was credited to the claimant's deposit.
    pub credited_to_deposit: bool,
}
