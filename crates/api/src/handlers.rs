//! Request handlers.
//!
//! Reads are public. Mutations take a [`Caller`] and persist a snapshot once
//! the ledger has committed.

use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::models::*;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use pool_ledger_domain::entities::{Cover, DepositView, Pool, PoolInfo};
use pool_ledger_domain::value_objects::{CoverId, PoolId, Principal, ProposalId};
use pool_ledger_engine::deposits::WithdrawalReceipt;
use pool_ledger_engine::journal::LedgerEvent;

/// Liveness and basic stats.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pools: state.ledger.registry().get_all_pools().await.len(),
    })
}

/// Creates a pool.
pub async fn create_pool(
    State(state): State<AppState>,
    Caller(call): Caller,
    Json(request): Json<CreatePoolRequest>,
) -> ApiResult<(StatusCode, Json<CreatePoolResponse>)> {
    let pool_id = state
        .ledger
        .registry()
        .create_pool(
            &call,
            request.risk_type,
            &request.pool_name,
            request.apy,
            request.min_period,
        )
        .await?;
    state.persist().await;
    Ok((StatusCode::CREATED, Json(CreatePoolResponse { pool_id })))
}

/// Lists every pool in creation order.
pub async fn list_pools(State(state): State<AppState>) -> Json<Vec<PoolListItem>> {
    let pools = state.ledger.registry().get_all_pools().await;
    Json(
        pools
            .into_iter()
            .map(|(pool_id, pool)| PoolListItem { pool_id, pool })
            .collect(),
    )
}

/// Reads one pool.
pub async fn get_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<Pool>> {
    Ok(Json(state.ledger.registry().get_pool(PoolId(pool_id)).await?))
}

/// Changes APY and minimum period.
pub async fn update_pool(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(pool_id): Path<u64>,
    Json(request): Json<UpdatePoolRequest>,
) -> ApiResult<StatusCode> {
    state
        .ledger
        .registry()
        .update_pool(&call, PoolId(pool_id), request.apy, request.min_period)
        .await?;
    state.persist().await;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivates a pool.
pub async fn deactivate_pool(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(pool_id): Path<u64>,
) -> ApiResult<StatusCode> {
    state
        .ledger
        .registry()
        .deactivate_pool(&call, PoolId(pool_id))
        .await?;
    state.persist().await;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether a pool accepts deposits.
pub async fn pool_active(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<PoolActiveResponse>> {
    let pool_id = PoolId(pool_id);
    let is_active = state.ledger.registry().pool_active(pool_id).await?;
    Ok(Json(PoolActiveResponse { pool_id, is_active }))
}

/// Pool tvl.
pub async fn pool_tvl(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<TvlResponse>> {
    let pool_id = PoolId(pool_id);
    let tvl = state.ledger.queries().get_pool_tvl(pool_id).await?;
    Ok(Json(TvlResponse { pool_id, tvl }))
}

/// Deposits into a pool as the caller.
pub async fn deposit(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(pool_id): Path<u64>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<Json<DepositView>> {
    let view = state
        .ledger
        .deposits()
        .deposit(&call, PoolId(pool_id), request.amount)
        .await?;
    state.persist().await;
    Ok(Json(view))
}

/// Withdraws from the caller's deposit.
pub async fn withdraw(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(pool_id): Path<u64>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<Json<WithdrawalReceipt>> {
    let receipt = state
        .ledger
        .deposits()
        .withdraw(&call, PoolId(pool_id), request.amount)
        .await?;
    state.persist().await;
    Ok(Json(receipt))
}

/// Credits the caller's elapsed daily payouts.
pub async fn settle_accrual(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<AccrualResponse>> {
    let credited = state
        .ledger
        .accrual()
        .settle_accrual(&call, PoolId(pool_id))
        .await?;
    state.persist().await;
    Ok(Json(AccrualResponse { credited }))
}

/// Reads a deposit.
pub async fn get_user_deposit(
    State(state): State<AppState>,
    Path((pool_id, principal)): Path<(u64, String)>,
) -> ApiResult<Json<DepositView>> {
    let view = state
        .ledger
        .deposits()
        .get_user_deposit(PoolId(pool_id), &Principal::new(principal))
        .await?;
    Ok(Json(view))
}

/// Days accrued but not yet credited.
pub async fn claimable_days(
    State(state): State<AppState>,
    Path((pool_id, principal)): Path<(u64, String)>,
) -> ApiResult<Json<ClaimableDaysResponse>> {
    let days = state
        .ledger
        .accrual()
        .claimable_days(&Principal::new(principal), PoolId(pool_id))
        .await?;
    Ok(Json(ClaimableDaysResponse { days }))
}

/// Time of the last accrual settlement.
pub async fn last_claim_time(
    State(state): State<AppState>,
    Path((pool_id, principal)): Path<(u64, String)>,
) -> ApiResult<Json<LastClaimTimeResponse>> {
    let last_claim_time = state
        .ledger
        .accrual()
        .last_claim_time(&Principal::new(principal), PoolId(pool_id))
        .await?;
    Ok(Json(LastClaimTimeResponse { last_claim_time }))
}

/// Raises the claim-reserve split.
pub async fn increase_split(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(pool_id): Path<u64>,
    Json(request): Json<SplitRequest>,
) -> ApiResult<Json<SplitResponse>> {
    let pool_id = PoolId(pool_id);
    let split = state
        .ledger
        .split()
        .increase_percentage_split(&call, pool_id, request.delta)
        .await?;
    state.persist().await;
    Ok(Json(SplitResponse {
        pool_id,
        percentage_split_balance: split.value(),
    }))
}

/// Lowers the claim-reserve split.
pub async fn reduce_split(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(pool_id): Path<u64>,
    Json(request): Json<SplitRequest>,
) -> ApiResult<Json<SplitResponse>> {
    let pool_id = PoolId(pool_id);
    let split = state
        .ledger
        .split()
        .reduce_percentage_split(&call, pool_id, request.delta)
        .await?;
    state.persist().await;
    Ok(Json(SplitResponse {
        pool_id,
        percentage_split_balance: split.value(),
    }))
}

/// Covers of a pool.
pub async fn get_pool_covers(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<Vec<Cover>>> {
    Ok(Json(
        state.ledger.covers().get_pool_covers(PoolId(pool_id)).await?,
    ))
}

/// Attaches a cover.
pub async fn add_pool_cover(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(pool_id): Path<u64>,
    Json(cover): Json<Cover>,
) -> ApiResult<StatusCode> {
    state
        .ledger
        .covers()
        .add_pool_cover(&call, PoolId(pool_id), cover)
        .await?;
    state.persist().await;
    Ok(StatusCode::CREATED)
}

/// Replaces a cover.
pub async fn update_pool_cover(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path((pool_id, cover_id)): Path<(u64, u64)>,
    Json(cover): Json<Cover>,
) -> ApiResult<StatusCode> {
    if cover.id != CoverId(cover_id) {
        return Err(ApiError::BadRequest(format!(
            "path cover id {} does not match body cover id {}",
            cover_id, cover.id
        )));
    }
    state
        .ledger
        .covers()
        .update_pool_cover(&call, PoolId(pool_id), cover)
        .await?;
    state.persist().await;
    Ok(StatusCode::NO_CONTENT)
}

/// Journal of a pool.
pub async fn pool_events(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<Vec<LedgerEvent>>> {
    let pool_id = PoolId(pool_id);
    state.ledger.registry().pool_active(pool_id).await?;
    Ok(Json(state.ledger.events(pool_id).await))
}

/// Pays an approved claim.
pub async fn claim_proposal_funds(
    State(state): State<AppState>,
    Caller(call): Caller,
    Path(proposal_id): Path<u64>,
) -> ApiResult<Json<ClaimResponse>> {
    let proposal_id = ProposalId(proposal_id);
    let outcome = state
        .ledger
        .claims()
        .claim_proposal_funds(&call, proposal_id)
        .await?;
    state.persist().await;
    Ok(Json(ClaimResponse {
        proposal_id,
        outcome,
    }))
}

/// Every depositor across all pools.
pub async fn participants(State(state): State<AppState>) -> Json<Vec<Principal>> {
    Json(state.ledger.queries().get_all_participants().await)
}

/// Sum of a principal's deposits.
pub async fn participation(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> Json<ParticipationResponse> {
    let principal = Principal::new(principal);
    let total = state.ledger.queries().get_user_participation(&principal).await;
    Json(ParticipationResponse { principal, total })
}

/// Pools a principal participates in.
pub async fn pools_by_address(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> Json<Vec<PoolInfo>> {
    Json(
        state
            .ledger
            .queries()
            .get_pools_by_address(&Principal::new(principal))
            .await,
    )
}

/// Transfers ownership.
pub async fn set_owner(
    State(state): State<AppState>,
    Caller(call): Caller,
    Json(request): Json<OwnerRequest>,
) -> ApiResult<StatusCode> {
    state.ledger.set_owner(&call, request.owner).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rewires collaborator identities.
pub async fn set_collaborators(
    State(state): State<AppState>,
    Caller(call): Caller,
    Json(request): Json<CollaboratorsRequest>,
) -> ApiResult<StatusCode> {
    state
        .ledger
        .set_collaborators(&call, request.cover_service, request.governance)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
