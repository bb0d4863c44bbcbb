//! Ledger error taxonomy.

use crate::gateway::GatewayError;
use pool_ledger_domain::ValueError;
use pool_ledger_domain::value_objects::{CoverId, PoolId, Principal, ProposalId, TokenAmount};
use std::fmt;
use thiserror::Error;

/// Entity referenced by a [`LedgerError::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// A pool.
    Pool(PoolId),
    /// A depositor's position in a pool.
    Deposit {
        /// Pool.
        pool_id: PoolId,
        /// Depositor.
        lp: Principal,
    },
    /// A cover attached to a pool.
    Cover {
        /// Pool.
        pool_id: PoolId,
        /// Cover.
        cover_id: CoverId,
    },
    /// A governance proposal.
    Proposal(ProposalId),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool(id) => write!(f, "pool {}", id),
            Self::Deposit { pool_id, lp } => write!(f, "deposit of {} in pool {}", lp, pool_id),
            Self::Cover { pool_id, cover_id } => {
                write!(f, "cover {} in pool {}", cover_id, pool_id)
            }
            Self::Proposal(id) => write!(f, "proposal {}", id),
        }
    }
}

/// Errors returned by ledger operations.
///
/// A failed mutating call never leaves partial state behind: every check runs
/// before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(Entity),
    /// Pool is deactivated.
    #[error("pool {0} is inactive")]
    PoolInactive(PoolId),
    /// Amount must be positive.
    #[error("amount must be greater than zero")]
    InvalidAmount,
    /// Caller supplied a malformed value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Withdrawal exceeds principal plus accrued payout.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Requested amount.
        requested: TokenAmount,
        /// Withdrawable amount.
        available: TokenAmount,
    },
    /// Claim or cover capacity exceeds what the pool can fund.
    #[error("insufficient pool funds: requested {requested}, available {available}")]
    InsufficientPoolFunds {
        /// Requested amount.
        requested: TokenAmount,
        /// Amount the pool can fund.
        available: TokenAmount,
    },
    /// Percentage split would leave [0, 100].
    #[error("percentage split {current} cannot move by {delta}")]
    OutOfBounds {
        /// Split before the change.
        current: u8,
        /// Requested delta.
        delta: u64,
    },
    /// Caller lacks the required role.
    #[error("caller is not authorized")]
    Unauthorized,
    /// Caller has no deposit in the pool.
    #[error("caller has no deposit in pool {0}")]
    NoDeposit(PoolId),
    /// Deposit is already withdrawn and cannot be topped up or accrue.
    #[error("deposit in pool {0} is already withdrawn")]
    DepositClosed(PoolId),
    /// Proposal is not in the approved state.
    #[error("proposal {0} is not approved")]
    ProposalNotApproved(ProposalId),
    /// Balance arithmetic overflowed.
    #[error("arithmetic overflow")]
    Overflow,
    /// A collaborating service failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl LedgerError {
    /// Stable snake_case tag for this error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::PoolInactive(_) => "pool_inactive",
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::InsufficientPoolFunds { .. } => "insufficient_pool_funds",
            Self::OutOfBounds { .. } => "out_of_bounds",
            Self::Unauthorized => "unauthorized",
            Self::NoDeposit(_) => "no_deposit",
            Self::DepositClosed(_) => "deposit_closed",
            Self::ProposalNotApproved(_) => "proposal_not_approved",
            Self::Overflow => "overflow",
            Self::Gateway(_) => "gateway",
        }
    }
}

impl From<ValueError> for LedgerError {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::Overflow => Self::Overflow,
            other => Self::InvalidParameter(other.to_string()),
        }
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
