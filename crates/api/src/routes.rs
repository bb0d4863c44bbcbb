//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Builds the `/api/v1` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(pool_routes())
        .merge(participant_routes())
        .route(
            "/proposals/{proposal_id}/claim",
            post(handlers::claim_proposal_funds),
        )
        .route("/admin/owner", put(handlers::set_owner))
        .route("/admin/collaborators", put(handlers::set_collaborators))
}

fn pool_routes() -> Router<AppState> {
    Router::new()
        .route("/pools", get(handlers::list_pools).post(handlers::create_pool))
        .route(
            "/pools/{pool_id}",
            get(handlers::get_pool).put(handlers::update_pool),
        )
        .route("/pools/{pool_id}/deactivate", post(handlers::deactivate_pool))
        .route("/pools/{pool_id}/active", get(handlers::pool_active))
        .route("/pools/{pool_id}/tvl", get(handlers::pool_tvl))
        .route("/pools/{pool_id}/deposit", post(handlers::deposit))
        .route("/pools/{pool_id}/withdraw", post(handlers::withdraw))
        .route("/pools/{pool_id}/accrual", post(handlers::settle_accrual))
        .route(
            "/pools/{pool_id}/deposits/{principal}",
            get(handlers::get_user_deposit),
        )
        .route(
            "/pools/{pool_id}/deposits/{principal}/claimable-days",
            get(handlers::claimable_days),
        )
        .route(
            "/pools/{pool_id}/deposits/{principal}/last-claim-time",
            get(handlers::last_claim_time),
        )
        .route("/pools/{pool_id}/split/increase", post(handlers::increase_split))
        .route("/pools/{pool_id}/split/reduce", post(handlers::reduce_split))
        .route(
            "/pools/{pool_id}/covers",
            get(handlers::get_pool_covers).post(handlers::add_pool_cover),
        )
        .route(
            "/pools/{pool_id}/covers/{cover_id}",
            put(handlers::update_pool_cover),
        )
        .route("/pools/{pool_id}/events", get(handlers::pool_events))
}

fn participant_routes() -> Router<AppState> {
    Router::new()
        .route("/participants", get(handlers::participants))
        .route("/participants/{principal}", get(handlers::participation))
        .route(
            "/participants/{principal}/pools",
            get(handlers::pools_by_address),
        )
}
