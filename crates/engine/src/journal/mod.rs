//! Ledger event journal.
//!
//! Records every committed mutation per pool:
//! - Pool creation, updates and deactivation
//! - Deposits, withdrawals and accrual settlements
//! - Split adjustments and cover changes
//! - Claim settlements

mod events;
mod recorder;

pub use events::*;
pub use recorder::*;
