//! Repository implementations for ledger persistence.

mod snapshot_repository;

pub use snapshot_repository::SnapshotRepository;
