use crate::entities::deposit::Deposit;
use crate::enums::{DepositStatus, RiskType};
use crate::value_objects::{PoolId, Principal, SplitPercentage, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub pool_name: String,
    pub risk_type: RiskType,
    /// Annualized yield in whole percent.
    pub apy: u64,
    /// Minimum commitment in days.
    pub min_period: u64,
    /// Sum of active deposit principal.
    pub tvl: TokenAmount,
    /// Cumulative capital ever deposited.
    pub tcp: TokenAmount,
    pub is_active: bool,
    pub percentage_split_balance: SplitPercentage,
    /// Claim payouts already drawn from the reserve.
    pub claims_paid: TokenAmount,
    /// Accrued daily payouts withdrawn by depositors, also drawn from the reserve.
    #[serde(default)]
    pub accruals_paid: TokenAmount,
    pub created_at: u64,
    pub deposits: BTreeMap<Principal, Deposit>,
}

impl Pool {
    pub fn new(
        id: PoolId,
        pool_name: impl Into<String>,
        risk_type: RiskType,
        apy: u64,
        min_period: u64,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            pool_name: pool_name.into(),
            risk_type,
            apy,
            min_period,
            tvl: TokenAmount::zero(),
            tcp: TokenAmount::zero(),
            is_active: true,
            percentage_split_balance: SplitPercentage::zero(),
            claims_paid: TokenAmount::zero(),
            accruals_paid: TokenAmount::zero(),
            created_at,
            deposits: BTreeMap::new(),
        }
    }

    /// Portion of tvl earmarked for claims: `floor(tvl * split / 100)`.
    pub fn reserved_funds(&self) -> TokenAmount {
        self.percentage_split_balance.apply(self.tvl)
    }

    /// Capital left for backing covers once the claim reserve is set aside.
    pub fn cover_capital(&self) -> TokenAmount {
        self.tvl.saturating_sub(self.reserved_funds())
    }

    /// Principal held by active deposits. Equals `tvl` whenever the ledger is consistent.
    pub fn active_principal(&self) -> Option<TokenAmount> {
        TokenAmount::checked_sum(
            self.deposits
                .values()
                .filter(|d| d.status == DepositStatus::Active)
                .map(|d| d.amount),
        )
    }

    /// Denormalized view of this pool for one depositor.
    pub fn info_for(&self, deposit: &Deposit, now: u64) -> PoolInfo {
        PoolInfo {
            pool_id: self.id,
            pool_name: self.pool_name.clone(),
            risk_type: self.risk_type,
            apy: self.apy,
            min_period: self.min_period,
            tvl: self.tvl,
            tcp: self.tcp,
            is_active: self.is_active,
            deposit_amount: deposit.amount,
            daily_payout: deposit.daily_payout(self.apy).unwrap_or_default(),
            accrued_payout: deposit.accrued_payout,
            status: deposit.status,
            days_left: deposit.days_left(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub pool_id: PoolId,
    pub pool_name: String,
    pub risk_type: RiskType,
    pub apy: u64,
    pub min_period: u64,
    pub tvl: TokenAmount,
    pub tcp: TokenAmount,
    pub is_active: bool,
    pub deposit_amount: TokenAmount,
    pub daily_payout: TokenAmount,
    pub accrued_payout: TokenAmount,
    pub status: DepositStatus,
    pub days_left: u64,
}
