use crate::enums::DepositStatus;
use crate::error::ValueError;
use crate::math::accrual;
use crate::value_objects::{PoolId, Principal, TokenAmount};
use serde::{Deserialize, Serialize};

/// One depositor's position in one pool.
///
/// Only stored state lives here. `daily_payout` and `days_left` are derived
/// on read (see [`Deposit::view`]) so they can never drift from the amount,
/// the pool rate or the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub lp: Principal,
    pub pool_id: PoolId,
    pub status: DepositStatus,
    pub amount: TokenAmount,
    pub accrued_payout: TokenAmount,
    /// Part of `accrued_payout` credited by claim settlements. The reserve
    /// already paid for it, so withdrawing it charges nothing further.
    #[serde(default)]
    pub claim_credit: TokenAmount,
    pub start_date: u64,
    pub expiry_date: u64,
    /// Timestamp up to which daily payouts have been credited.
    pub last_claim_time: u64,
}

impl Deposit {
    /// Opens a new active deposit whose commitment runs `min_period` days from `now`.
    pub fn open(
        lp: Principal,
        pool_id: PoolId,
        amount: TokenAmount,
        now: u64,
        min_period: u64,
    ) -> Result<Self, ValueError> {
        let expiry_date = accrual::expiry_date(now, min_period).ok_or(ValueError::Overflow)?;
        Ok(Self {
            lp,
            pool_id,
            status: DepositStatus::Active,
            amount,
            accrued_payout: TokenAmount::zero(),
            claim_credit: TokenAmount::zero(),
            start_date: now,
            expiry_date,
            last_claim_time: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == DepositStatus::Active
    }

    /// Principal plus accrued payout.
    pub fn withdrawable(&self) -> Option<TokenAmount> {
        self.amount.checked_add(self.accrued_payout)
    }

    pub fn daily_payout(&self, apy: u64) -> Option<TokenAmount> {
        accrual::daily_payout(self.amount, apy)
    }

    pub fn days_left(&self, now: u64) -> u64 {
        accrual::days_left(self.expiry_date, now)
    }

    /// Whole days not yet credited. Withdrawn deposits accrue nothing.
    pub fn claimable_days(&self, now: u64) -> u64 {
        if !self.is_active() {
            return 0;
        }
        accrual::claimable_days(self.last_claim_time, self.expiry_date, now)
    }

    pub fn view(&self, apy: u64, now: u64) -> DepositView {
        DepositView {
            lp: self.lp.clone(),
            pool_id: self.pool_id,
            status: self.status,
            amount: self.amount,
            daily_payout: self.daily_payout(apy).unwrap_or_default(),
            accrued_payout: self.accrued_payout,
            start_date: self.start_date,
            expiry_date: self.expiry_date,
            days_left: self.days_left(now),
            last_claim_time: self.last_claim_time,
        }
    }
}

/// Read-side projection of a [`Deposit`] with its derived fields filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositView {
    pub lp: Principal,
    pub pool_id: PoolId,
    pub status: DepositStatus,
    pub amount: TokenAmount,
    pub daily_payout: TokenAmount,
    pub accrued_payout: TokenAmount,
    pub start_date: u64,
    pub expiry_date: u64,
    pub days_left: u64,
    pub last_claim_time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::accrual::SECONDS_PER_DAY;

    #[test]
    fn test_open_sets_commitment_window() {
        let d = Deposit::open(
            Principal::from("alice"),
            PoolId(0),
            TokenAmount::from(1000u64),
            5_000,
            30,
        )
        .unwrap();
        assert!(d.is_active());
        assert_eq!(d.start_date, 5_000);
        assert_eq!(d.last_claim_time, 5_000);
        assert_eq!(d.expiry_date, 5_000 + 30 * SECONDS_PER_DAY);
        assert_eq!(d.accrued_payout, TokenAmount::zero());
    }

    #[test]
    fn test_view_derives_fields() {
        let d = Deposit::open(
            Principal::from("alice"),
            PoolId(0),
            TokenAmount::from(365_000u64),
            0,
            30,
        )
        .unwrap();
        let view = d.view(10, 3 * SECONDS_PER_DAY);
        assert_eq!(view.daily_payout, TokenAmount::from(100u64));
        assert_eq!(view.days_left, 27);
        assert_eq!(d.claimable_days(3 * SECONDS_PER_DAY), 3);
    }

    #[test]
    fn test_withdrawn_deposit_accrues_nothing() {
        let mut d = Deposit::open(
            Principal::from("alice"),
            PoolId(0),
            TokenAmount::from(1000u64),
            0,
            30,
        )
        .unwrap();
        d.status = DepositStatus::Withdrawn;
        assert_eq!(d.claimable_days(10 * SECONDS_PER_DAY), 0);
    }
}
