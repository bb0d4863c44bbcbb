//! Deposit ledger: per-depositor positions within a pool.

use crate::access::CallContext;
use crate::accrual::settle_deposit;
use crate::error::{Entity, LedgerError, LedgerResult};
use crate::journal::{DepositData, EventData, LedgerEventType, WithdrawalData};
use crate::store::LedgerContext;
use pool_ledger_domain::entities::{Deposit, DepositView};
use pool_ledger_domain::enums::DepositStatus;
use pool_ledger_domain::value_objects::{PoolId, Principal, TokenAmount};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// How a withdrawal was funded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    /// Portion drawn from accrued payout.
    pub from_accrued: TokenAmount,
    /// Portion drawn from principal.
    pub from_principal: TokenAmount,
    /// Deposit after the withdrawal.
    pub deposit: DepositView,
}

/// Tracks deposits and moves funds in and out of pools.
pub struct DepositLedger {
    shared: Arc<LedgerContext>,
}

impl DepositLedger {
    /// Creates the ledger over the shared context.
    #[must_use]
    pub fn new(shared: Arc<LedgerContext>) -> Self {
        Self { shared }
    }

    /// Adds `amount` to the caller's position, opening one if needed.
    ///
    /// A top-up settles the accrual earned so far at the old amount and
    /// keeps the original expiry date.
    pub async fn deposit(
        &self,
        call: &CallContext,
        pool_id: PoolId,
        amount: TokenAmount,
    ) -> LedgerResult<DepositView> {
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;
        if !entry.pool.is_active {
            debug!(pool_id = %pool_id, "Deposit rejected: pool inactive");
            return Err(LedgerError::PoolInactive(pool_id));
        }
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let now = self.shared.now();
        let lp = call.caller().clone();
        let pool = &entry.pool;

        let (updated, top_up) = match pool.deposits.get(&lp) {
            Some(existing) if !existing.is_active() => {
                debug!(pool_id = %pool_id, lp = %lp, "Deposit rejected: position closed");
                return Err(LedgerError::DepositClosed(pool_id));
            }
            Some(existing) => {
                let mut updated = existing.clone();
                settle_deposit(&mut updated, pool.apy, now)?;
                updated.amount = updated
                    .amount
                    .checked_add(amount)
                    .ok_or(LedgerError::Overflow)?;
                (updated, true)
            }
            None => (
                Deposit::open(lp.clone(), pool_id, amount, now, pool.min_period)?,
                false,
            ),
        };
        let tvl = pool.tvl.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let tcp = pool.tcp.checked_add(amount).ok_or(LedgerError::Overflow)?;

        let view = updated.view(pool.apy, now);
        entry.pool.deposits.insert(lp.clone(), updated);
        entry.pool.tvl = tvl;
        entry.pool.tcp = tcp;
        drop(entry);

        info!(
            pool_id = %pool_id,
            lp = %lp,
            amount = %amount,
            top_up = top_up,
            tvl = %tvl,
            "Deposit recorded"
        );
        self.shared
            .journal
            .record(
                LedgerEventType::Deposited,
                pool_id,
                now,
                EventData::Deposit(DepositData {
                    lp,
                    amount,
                    top_up,
                    new_tvl: tvl,
                }),
            )
            .await;
        Ok(view)
    }

    /// Withdraws `amount` from the caller's position.
    ///
    /// Elapsed days are settled first. The amount is drawn from accrued
    /// payout before principal and only the principal portion leaves `tvl`.
    /// Accrued daily payout is funded by the pool's reserve and fails with
    /// `InsufficientPoolFunds` when the reserve headroom is short. The
    /// principal portion may not leave attached covers without backing
    /// capital. Draining both sets the deposit to Withdrawn. Inactive pools
    /// still allow withdrawals.
    pub async fn withdraw(
        &self,
        call: &CallContext,
        pool_id: PoolId,
        amount: TokenAmount,
    ) -> LedgerResult<WithdrawalReceipt> {
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;
        let now = self.shared.now();
        let lp = call.caller().clone();
        let pool = &entry.pool;

        let mut updated = pool
            .deposits
            .get(&lp)
            .cloned()
            .ok_or(LedgerError::NoDeposit(pool_id))?;
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }
        settle_deposit(&mut updated, pool.apy, now)?;

        let available = updated.withdrawable().ok_or(LedgerError::Overflow)?;
        if amount > available {
            debug!(
                pool_id = %pool_id,
                lp = %lp,
                requested = %amount,
                available = %available,
                "Withdrawal rejected"
            );
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        let from_accrued = amount.min(updated.accrued_payout);
        let from_principal = amount.saturating_sub(from_accrued);
        // claim credits were charged to the reserve when settled
        let from_claims = from_accrued.min(updated.claim_credit);
        let from_reserve = from_accrued.saturating_sub(from_claims);

        if !from_reserve.is_zero() {
            let available = entry.claim_headroom()?;
            if from_reserve > available {
                debug!(
                    pool_id = %pool_id,
                    lp = %lp,
                    requested = %from_reserve,
                    available = %available,
                    "Withdrawal rejected: reserve cannot fund accrued payout"
                );
                return Err(LedgerError::InsufficientPoolFunds {
                    requested: from_reserve,
                    available,
                });
            }
        }
        let accruals_paid = pool
            .accruals_paid
            .checked_add(from_reserve)
            .ok_or(LedgerError::Overflow)?;

        updated.accrued_payout = updated.accrued_payout.saturating_sub(from_accrued);
        updated.claim_credit = updated.claim_credit.saturating_sub(from_claims);
        updated.amount = updated
            .amount
            .checked_sub(from_principal)
            .ok_or(LedgerError::Overflow)?;
        let closed = updated.is_active()
            && updated.amount.is_zero()
            && updated.accrued_payout.is_zero();
        if closed {
            updated.status = DepositStatus::Withdrawn;
        }
        let tvl = pool
            .tvl
            .checked_sub(from_principal)
            .ok_or(LedgerError::Overflow)?;
        if !from_principal.is_zero() {
            entry.ensure_cover_capacity(&entry.covers, tvl, pool.percentage_split_balance)?;
        }

        let view = updated.view(pool.apy, now);
        entry.pool.deposits.insert(lp.clone(), updated);
        entry.pool.tvl = tvl;
        entry.pool.accruals_paid = accruals_paid;
        drop(entry);

        info!(
            pool_id = %pool_id,
            lp = %lp,
            amount = %amount,
            from_accrued = %from_accrued,
            from_reserve = %from_reserve,
            from_principal = %from_principal,
            closed = closed,
            tvl = %tvl,
            "Withdrawal recorded"
        );
        self.shared
            .journal
            .record(
                LedgerEventType::Withdrawn,
                pool_id,
                now,
                EventData::Withdrawal(WithdrawalData {
                    lp,
                    from_accrued,
                    from_principal,
                    closed,
                    new_tvl: tvl,
                }),
            )
            .await;
        Ok(WithdrawalReceipt {
            from_accrued,
            from_principal,
            deposit: view,
        })
    }

    /// Reads `lp`'s position in `pool_id`.
    pub async fn get_user_deposit(
        &self,
        pool_id: PoolId,
        lp: &Principal,
    ) -> LedgerResult<DepositView> {
        let handle = self.shared.store.entry(pool_id).await?;
        let entry = handle.lock().await;
        entry
            .pool
            .deposits
            .get(lp)
            .map(|deposit| deposit.view(entry.pool.apy, self.shared.now()))
            .ok_or_else(|| {
                LedgerError::NotFound(Entity::Deposit {
                    pool_id,
                    lp: lp.clone(),
                })
            })
    }
}
