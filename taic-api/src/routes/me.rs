use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;

use taic_shared::errors::{AppError, AppResult};
use taic_shared::types::auth::AuthUser;
use taic_shared::types::ApiResponse;

use crate::models::{PublicUser, User};
use crate::schema::users;
use crate::AppState;

pub async fn me(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user: User = users::table
        .find(user.id)
        .first(&mut conn)
        .map_err(|_| AppError::not_found("user not found"))?;

    Ok(Json(ApiResponse::ok(user.into())))
}
