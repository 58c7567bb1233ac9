use axum::extract::{Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use taic_shared::errors::{AppError, AppResult};
use taic_shared::middleware::AdminApiKey;
use taic_shared::types::pagination::{Paginated, PaginationParams};
use taic_shared::types::ApiResponse;

use crate::models::{PublicUser, Stake, User};
use crate::schema::{stakes, users};
use crate::services::staking_service::STATUS_ACTIVE;
use crate::AppState;

pub async fn list_users(
    _key: AdminApiKey,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<PublicUser>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let total: i64 = users::table.count().get_result(&mut conn)?;

    let items: Vec<User> = users::table
        .order(users::created_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load(&mut conn)?;

    let items: Vec<PublicUser> = items.into_iter().map(PublicUser::from).collect();

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &params))))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeOverview {
    pub stakes: Paginated<Stake>,
    pub active_count: u64,
    pub active_total: i64,
}

pub async fn list_stakes(
    _key: AdminApiKey,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<StakeOverview>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let total: i64 = stakes::table.count().get_result(&mut conn)?;

    let items: Vec<Stake> = stakes::table
        .order(stakes::created_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load(&mut conn)?;

    let active_amounts: Vec<i64> = stakes::table
        .filter(stakes::status.eq(STATUS_ACTIVE))
        .select(stakes::amount)
        .load(&mut conn)?;

    Ok(Json(ApiResponse::ok(StakeOverview {
        stakes: Paginated::new(items, total as u64, &params),
        active_count: active_amounts.len() as u64,
        active_total: active_amounts.iter().sum(),
    })))
}
