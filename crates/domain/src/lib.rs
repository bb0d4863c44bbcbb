//! Core domain model for the pool ledger.
//!
//! Entities (pools, deposits, covers, proposals), closed enums, value
//! objects and the integer accrual math shared by the engine, the
//! persistence layer and the API.

pub mod entities;
pub mod enums;
pub mod error;
pub mod math;
pub mod value_objects;

pub use error::ValueError;
