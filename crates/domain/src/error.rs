use thiserror::Error;

/// Errors raised while constructing value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid token amount: {0}")]
    InvalidAmount(String),
    #[error("percentage {0} is outside [0, 100]")]
    PercentageOutOfRange(u64),
    #[error("arithmetic overflow")]
    Overflow,
}
