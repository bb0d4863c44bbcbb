//! Accrual engine.
//!
//! Payouts accrue lazily: nothing runs on a timer. Whole elapsed days are
//! credited to `accrued_payout` whenever a deposit is settled (explicitly,
//! before a top-up or withdrawal, or before a rate change).

use crate::access::CallContext;
use crate::error::{Entity, LedgerError, LedgerResult};
use crate::journal::{AccrualData, EventData, LedgerEventType};
use crate::store::LedgerContext;
use pool_ledger_domain::entities::Deposit;
use pool_ledger_domain::math::accrual::{self, SECONDS_PER_DAY};
use pool_ledger_domain::value_objects::{PoolId, Principal, TokenAmount};
use std::sync::Arc;
use tracing::info;

/// Result of settling one deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualSettlement {
    /// Whole days credited.
    pub days: u64,
    /// Amount credited.
    pub credited: TokenAmount,
}

impl AccrualSettlement {
    fn none() -> Self {
        Self {
            days: 0,
            credited: TokenAmount::zero(),
        }
    }
}

/// Credits the whole days elapsed since the last settlement.
///
/// `last_claim_time` advances by exactly the credited days, so a partial day
/// keeps accruing toward the next settlement. Works in place; callers pass a
/// copy when the surrounding operation may still fail.
pub fn settle_deposit(deposit: &mut Deposit, apy: u64, now: u64) -> LedgerResult<AccrualSettlement> {
    let days = deposit.claimable_days(now);
    if days == 0 {
        return Ok(AccrualSettlement::none());
    }
    let daily = deposit.daily_payout(apy).ok_or(LedgerError::Overflow)?;
    let credited = accrual::payout_for_days(daily, days).ok_or(LedgerError::Overflow)?;
    let accrued = deposit
        .accrued_payout
        .checked_add(credited)
        .ok_or(LedgerError::Overflow)?;
    let last_claim_time = days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|span| deposit.last_claim_time.checked_add(span))
        .ok_or(LedgerError::Overflow)?;

    deposit.accrued_payout = accrued;
    deposit.last_claim_time = last_claim_time;
    Ok(AccrualSettlement { days, credited })
}

/// Computes and settles daily payouts.
pub struct AccrualEngine {
    shared: Arc<LedgerContext>,
}

impl AccrualEngine {
    /// Creates the engine over the shared context.
    #[must_use]
    pub fn new(shared: Arc<LedgerContext>) -> Self {
        Self { shared }
    }

    /// Credits the caller's elapsed daily payouts and returns the amount credited.
    pub async fn settle_accrual(
        &self,
        call: &CallContext,
        pool_id: PoolId,
    ) -> LedgerResult<TokenAmount> {
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;
        let now = self.shared.now();
        let apy = entry.pool.apy;
        let lp = call.caller().clone();

        let deposit = entry
            .pool
            .deposits
            .get_mut(&lp)
            .ok_or(LedgerError::NoDeposit(pool_id))?;
        if !deposit.is_active() {
            return Err(LedgerError::DepositClosed(pool_id));
        }

        let mut updated = deposit.clone();
        let settlement = settle_deposit(&mut updated, apy, now)?;
        *deposit = updated;
        drop(entry);

        if settlement.days > 0 {
            info!(
                pool_id = %pool_id,
                lp = %lp,
                days = settlement.days,
                credited = %settlement.credited,
                "Accrual settled"
            );
            self.shared
                .journal
                .record(
                    LedgerEventType::AccrualSettled,
                    pool_id,
                    now,
                    EventData::Accrual(AccrualData {
                        lp,
                        days: settlement.days,
                        credited: settlement.credited,
                    }),
                )
                .await;
        }
        Ok(settlement.credited)
    }

    /// Whole days accrued by `lp` in `pool_id` but not yet credited.
    pub async fn claimable_days(&self, lp: &Principal, pool_id: PoolId) -> LedgerResult<u64> {
        let now = self.shared.now();
        self.with_deposit(lp, pool_id, |deposit, _| deposit.claimable_days(now))
            .await
    }

    /// Timestamp up to which `lp`'s payouts have been credited.
    pub async fn last_claim_time(&self, lp: &Principal, pool_id: PoolId) -> LedgerResult<u64> {
        self.with_deposit(lp, pool_id, |deposit, _| deposit.last_claim_time)
            .await
    }

    /// Current daily payout rate for `lp` in `pool_id`.
    pub async fn daily_payout(&self, lp: &Principal, pool_id: PoolId) -> LedgerResult<TokenAmount> {
        self.with_deposit(lp, pool_id, |deposit, apy| deposit.daily_payout(apy))
            .await?
            .ok_or(LedgerError::Overflow)
    }

    async fn with_deposit<T>(
        &self,
        lp: &Principal,
        pool_id: PoolId,
        read: impl FnOnce(&Deposit, u64) -> T,
    ) -> LedgerResult<T> {
        let handle = self.shared.store.entry(pool_id).await?;
        let entry = handle.lock().await;
        let deposit = entry.pool.deposits.get(lp).ok_or_else(|| {
            LedgerError::NotFound(Entity::Deposit {
                pool_id,
                lp: lp.clone(),
            })
        })?;
        Ok(read(deposit, entry.pool.apy))
    }
}
