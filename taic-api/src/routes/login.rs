use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;

use taic_shared::errors::{AppError, AppResult, ErrorCode};
use taic_shared::types::auth::UserRole;
use taic_shared::types::ApiResponse;

use crate::models::User;
use crate::routes::AuthResponse;
use crate::schema::users;
use crate::services::{auth_service, token_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Every credential failure returns the same generic message so responses
/// cannot be used to probe which emails exist or how an account
/// authenticates.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user: User = users::table
        .filter(users::email.eq(req.email.to_lowercase()))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::InvalidCredentials, "invalid email or password"))?;

    if auth_service::is_wallet_only(&user.password_hash) {
        tracing::debug!(user_id = %user.id, "password login attempted on wallet-only account");
        return Err(AppError::new(ErrorCode::InvalidCredentials, "invalid email or password"));
    }

    let valid = auth_service::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::new(ErrorCode::InvalidCredentials, "invalid email or password"));
    }

    let role = user.role.parse::<UserRole>().unwrap_or(UserRole::User);

    let session = token_service::create_session_token(
        user.id,
        user.wallet_address.clone(),
        role,
        &state.config.jwt_secret,
        state.config.jwt_ttl_secs,
    )?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(ApiResponse::ok(AuthResponse {
        session,
        user: user.into(),
    })))
}
