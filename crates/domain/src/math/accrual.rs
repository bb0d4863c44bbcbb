//! Integer payout accrual.
//!
//! Every function here is pure: stored deposit fields plus the current time
//! in, derived values out. Division always truncates so a pool never pays
//! out more than its rate allows.

use crate::value_objects::amount::TokenAmount;

/// Length of one accrual day in seconds.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Days in the year used to de-annualize the APY.
pub const DAYS_PER_YEAR: u64 = 365;

/// Daily payout for `amount` at `apy` percent: `floor(amount * apy / 100 / 365)`.
///
/// Returns `None` if `amount * apy` overflows.
pub fn daily_payout(amount: TokenAmount, apy: u64) -> Option<TokenAmount> {
    amount
        .checked_mul_u64(apy)
        .map(|scaled| scaled.div_u64(100).div_u64(DAYS_PER_YEAR))
}

/// Whole days between the last settlement and `min(now, expiry)`.
pub fn claimable_days(last_claim_time: u64, expiry_date: u64, now: u64) -> u64 {
    let end = now.min(expiry_date);
    end.saturating_sub(last_claim_time) / SECONDS_PER_DAY
}

/// Remaining commitment in days, rounded up so a fresh deposit reports its
/// full minimum period.
pub fn days_left(expiry_date: u64, now: u64) -> u64 {
    expiry_date.saturating_sub(now).div_ceil(SECONDS_PER_DAY)
}

/// Expiry timestamp for a commitment of `min_period` days starting at `start`.
pub fn expiry_date(start: u64, min_period: u64) -> Option<u64> {
    min_period
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|span| start.checked_add(span))
}

/// Payout owed for `days` at `daily`.
pub fn payout_for_days(daily: TokenAmount, days: u64) -> Option<TokenAmount> {
    daily.checked_mul_u64(days)
}
