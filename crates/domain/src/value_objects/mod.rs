pub mod amount;
pub mod identity;
pub mod percentage;

pub use amount::TokenAmount;
pub use identity::{CoverId, PoolId, Principal, ProposalId};
pub use percentage::SplitPercentage;
