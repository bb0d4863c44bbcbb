//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use pool_ledger_engine::prelude::*;
//! ```

// Access
pub use crate::access::{AccessConfig, AccessControl, CallContext, Role};

// Components
pub use crate::accrual::{AccrualEngine, AccrualSettlement};
pub use crate::claims::{ClaimOutcome, ClaimsSettlement};
pub use crate::covers::CoverBook;
pub use crate::deposits::{DepositLedger, WithdrawalReceipt};
pub use crate::ledger::PoolLedger;
pub use crate::queries::QueryFacade;
pub use crate::registry::PoolRegistry;
pub use crate::split::SplitController;

// Infrastructure
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::error::{Entity, LedgerError, LedgerResult};
pub use crate::gateway::{
    GatewayError, GovernanceGateway, InMemoryGovernance, InMemoryTokenLedger, TokenLedger,
};
pub use crate::journal::{EventData, EventJournal, LedgerEvent, LedgerEventType};
pub use crate::store::{LedgerContext, LedgerSnapshot, LedgerStore, PoolEntry};
