use crate::error::ValueError;
use crate::value_objects::amount::TokenAmount;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Share of a pool's funds earmarked as claim reserve, in whole percent.
///
/// Always within `[0, 100]`. The value only moves through
/// [`increase`](Self::increase) and [`reduce`](Self::reduce), which refuse to
/// leave the range instead of clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SplitPercentage(u8);

impl SplitPercentage {
    pub const MAX: u8 = 100;

    pub fn new(value: u64) -> Result<Self, ValueError> {
        if value > u64::from(Self::MAX) {
            return Err(ValueError::PercentageOutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn increase(self, delta: u64) -> Option<Self> {
        u64::from(self.0)
            .checked_add(delta)
            .and_then(|v| Self::new(v).ok())
    }

    #[must_use]
    pub fn reduce(self, delta: u64) -> Option<Self> {
        u64::from(self.0)
            .checked_sub(delta)
            .and_then(|v| Self::new(v).ok())
    }

    /// `floor(amount * self / 100)`, computed without intermediate overflow.
    pub fn apply(&self, amount: TokenAmount) -> TokenAmount {
        let hundred = U256::from(100u64);
        let pct = U256::from(self.0);
        let raw = amount.as_u256();
        TokenAmount((raw / hundred) * pct + (raw % hundred) * pct / hundred)
    }
}

impl TryFrom<u64> for SplitPercentage {
    type Error = ValueError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SplitPercentage> for u64 {
    fn from(p: SplitPercentage) -> Self {
        u64::from(p.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(SplitPercentage::new(100).is_ok());
        assert_eq!(
            SplitPercentage::new(101),
            Err(ValueError::PercentageOutOfRange(101))
        );
        assert_eq!(SplitPercentage::zero().increase(150), None);
        assert_eq!(SplitPercentage::zero().reduce(1), None);
        let p = SplitPercentage::zero().increase(40).unwrap();
        assert_eq!(p.value(), 40);
        assert_eq!(p.reduce(40), Some(SplitPercentage::zero()));
        assert_eq!(p.increase(u64::MAX), None);
    }

    #[test]
    fn test_apply_floors() {
        let p = SplitPercentage::new(33).unwrap();
        assert_eq!(p.apply(TokenAmount::from(1000u64)), TokenAmount::from(330u64));
        assert_eq!(p.apply(TokenAmount::from(10u64)), TokenAmount::from(3u64));
        let full = SplitPercentage::new(100).unwrap();
        let max = TokenAmount(U256::MAX);
        assert_eq!(full.apply(max), max);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<SplitPercentage>("101").is_err());
        let p: SplitPercentage = serde_json::from_str("25").unwrap();
        assert_eq!(p.value(), 25);
    }
}
