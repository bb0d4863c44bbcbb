//! Pool ledger engine.
//!
//! This crate implements the accounting core of the risk pool service:
//! - Pool registry with owner-gated administration
//! - Deposit ledger maintaining the tvl invariant
//! - Lazy daily payout accrual
//! - Claim-reserve percentage split
//! - Covers bounded by non-reserved capital
//! - Idempotent settlement of governance-approved claims
//! - Cross-pool queries and an event journal
//!
//! Every pool is serialized behind its own lock; different pools proceed in
//! parallel.

/// Prelude module for convenient imports.
pub mod prelude;

/// Caller identity and role gates.
pub mod access;
/// Daily payout accrual.
pub mod accrual;
/// Claims settlement.
pub mod claims;
/// Time source.
pub mod clock;
/// Pool covers.
pub mod covers;
/// Deposits and withdrawals.
pub mod deposits;
/// Error taxonomy.
pub mod error;
/// Collaborating services.
pub mod gateway;
/// Ledger event journal.
pub mod journal;
/// Ledger façade.
pub mod ledger;
/// Cross-pool queries.
pub mod queries;
/// Pool registry.
pub mod registry;
/// Percentage split controller.
pub mod split;
/// Shared pool store.
pub mod store;

pub use error::{Entity, LedgerError, LedgerResult};
pub use ledger::PoolLedger;
