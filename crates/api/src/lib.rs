//! REST API server and endpoints.
//!
//! This crate exposes the pool ledger over HTTP:
//! - Pool administration and queries
//! - Deposits, withdrawals and accrual settlement
//! - Percentage split and cover management
//! - Claim settlement for governance
//! - API key authentication

/// Authentication module.
pub mod auth;
/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Application state.
pub mod state;

pub use auth::{AuthConfig, AuthError, AuthState, Caller};
pub use error::ApiError;
pub use server::{ApiServer, ServerConfig, build_router};
pub use state::AppState;
