pub mod cover;
pub mod deposit;
pub mod pool;
pub mod proposal;

// Re-export for easier access
pub use cover::Cover;
pub use deposit::{Deposit, DepositView};
pub use pool::{Pool, PoolInfo};
pub use proposal::{Proposal, ProposalParams};
