use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use taic_shared::errors::AppResult;
use taic_shared::types::auth::AuthUser;
use taic_shared::types::ApiResponse;

use crate::models::Stake;
use crate::services::staking_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StakeRequest {
    pub amount: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeResponse {
    pub stake: Stake,
    pub new_balance: i64,
    pub total_staked: i64,
}

pub async fn stake(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<StakeRequest>,
) -> AppResult<Json<ApiResponse<StakeResponse>>> {
    let outcome = staking_service::stake(&state.db, user.id, req.amount)?;

    Ok(Json(ApiResponse::ok(StakeResponse {
        stake: outcome.stake,
        new_balance: outcome.new_balance,
        total_staked: outcome.total_staked,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnstakeRequest {
    pub stake_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnstakeResponse {
    pub unstaked_amount: i64,
    pub new_balance: i64,
    pub total_staked: i64,
}

pub async fn unstake(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnstakeRequest>,
) -> AppResult<Json<ApiResponse<UnstakeResponse>>> {
    let outcome = staking_service::unstake(&state.db, user.id, req.stake_id)?;

    Ok(Json(ApiResponse::ok_with_message(
        UnstakeResponse {
            unstaked_amount: outcome.unstaked_amount,
            new_balance: outcome.new_balance,
            total_staked: outcome.total_staked,
        },
        "stake released",
    )))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingSummary {
    pub balance: i64,
    pub total_staked: i64,
    pub cashback_balance: i64,
    pub stakes: Vec<Stake>,
}

pub async fn summary(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<StakingSummary>>> {
    let (user, stakes) = staking_service::summary(&state.db, user.id)?;

    Ok(Json(ApiResponse::ok(StakingSummary {
        balance: user.balance,
        total_staked: user.staked_balance,
        cashback_balance: user.cashback_balance,
        stakes,
    })))
}
