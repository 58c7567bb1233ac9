use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use taic_shared::errors::{AppError, AppResult, ErrorCode};
use taic_shared::types::auth::UserRole;
use taic_shared::types::ApiResponse;

use crate::models::{NewUser, User};
use crate::routes::AuthResponse;
use crate::schema::users;
use crate::services::{auth_service, token_service};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    auth_service::validate_password(&req.password)?;

    let password_hash = auth_service::hash_password(&req.password)?;
    let email = req.email.to_lowercase();
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let exists: bool = users::table
        .filter(users::email.eq(&email))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);

    if exists {
        return Err(AppError::new(ErrorCode::EmailAlreadyExists, "email already registered"));
    }

    let new_user = NewUser {
        email: Some(email),
        password_hash,
        display_name: req.name,
        wallet_address: None,
        role: UserRole::User.to_string(),
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result(&mut conn)?;

    let session = token_service::create_session_token(
        user.id,
        user.wallet_address.clone(),
        UserRole::User,
        &state.config.jwt_secret,
        state.config.jwt_ttl_secs,
    )?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(ApiResponse::ok(AuthResponse {
        session,
        user: user.into(),
    })))
}
