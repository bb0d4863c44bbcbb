//! Persistence and remote collaborators for the pool ledger.
//!
//! - [`repositories::SnapshotRepository`] stores the ledger as a JSON snapshot
//! - [`gateways`] talks to the governance and token-ledger services over HTTP

/// Error type.
pub mod error;
/// HTTP collaborators.
pub mod gateways;
/// Snapshot persistence.
pub mod repositories;

pub use error::DataError;
