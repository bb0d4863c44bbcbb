use crate::error::ValueError;
use primitive_types::U256;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Non-negative token quantity.
///
/// Backed by a 256-bit unsigned integer. Arithmetic is checked: callers get
/// `None` on overflow or underflow instead of a wrapped value. On the wire the
/// amount is a decimal string so it survives JSON consumers limited to 53-bit
/// numbers; plain JSON integers are accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    pub fn new(amount: impl Into<U256>) -> Self {
        Self(amount.into())
    }

    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_mul_u64(self, rhs: u64) -> Option<Self> {
        self.0.checked_mul(U256::from(rhs)).map(Self)
    }

    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Floor division by a non-zero integer.
    #[must_use]
    pub fn div_u64(self, rhs: u64) -> Self {
        debug_assert!(rhs != 0);
        Self(self.0 / U256::from(rhs))
    }

    /// Sums an iterator of amounts, returning `None` on overflow.
    pub fn checked_sum<I>(iter: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        iter.into_iter()
            .try_fold(Self::zero(), |acc, amount| acc.checked_add(amount))
    }
}

impl From<u64> for TokenAmount {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl From<u128> for TokenAmount {
    fn from(v: u128) -> Self {
        Self(U256::from(v))
    }
}

impl FromStr for TokenAmount {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s.trim())
            .map(Self)
            .map_err(|_| ValueError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Integer(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireAmount::deserialize(deserializer)? {
            WireAmount::Integer(v) => Ok(Self::from(v)),
            WireAmount::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        let a = TokenAmount::from(10u64);
        let b = TokenAmount::from(4u64);
        assert_eq!(a.checked_sub(b), Some(TokenAmount::from(6u64)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(TokenAmount(U256::MAX).checked_add(b), None);
        assert_eq!(b.saturating_sub(a), TokenAmount::zero());
    }

    #[test]
    fn test_checked_sum() {
        let total = TokenAmount::checked_sum([1u64, 2, 3].map(TokenAmount::from));
        assert_eq!(total, Some(TokenAmount::from(6u64)));
        let overflow = TokenAmount::checked_sum([TokenAmount(U256::MAX), TokenAmount::from(1u64)]);
        assert_eq!(overflow, None);
    }

    #[test]
    fn test_json_accepts_strings_and_integers() {
        let from_str: TokenAmount = serde_json::from_str("\"1500\"").unwrap();
        let from_int: TokenAmount = serde_json::from_str("1500").unwrap();
        assert_eq!(from_str, from_int);
        assert_eq!(serde_json::to_string(&from_int).unwrap(), "\"1500\"");
    }

    #[test]
    fn test_json_rejects_negative() {
        assert!(serde_json::from_str::<TokenAmount>("-1").is_err());
        assert!(serde_json::from_str::<TokenAmount>("\"abc\"").is_err());
    }
}
