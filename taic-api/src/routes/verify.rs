use axum::extract::State;
use axum::Json;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use taic_shared::errors::{AppError, AppResult, ErrorCode};
use taic_shared::types::auth::UserRole;
use taic_shared::types::ApiResponse;

use crate::models::User;
use crate::routes::AuthResponse;
use crate::schema::users;
use crate::services::{token_service, wallet_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub wallet_address: String,
    pub signature: String,
}

/// Verify a signed challenge and mint a session. The nonce is consumed on
/// every outcome past the "challenge exists" check, success or failure, so
/// a signature can never be replayed and a failed attempt always forces a
/// fresh challenge.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let address = wallet_service::normalize_address(&req.wallet_address)?;
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user: User = users::table
        .filter(users::wallet_address.eq(&address))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::WalletNotFound, "wallet not registered"))?;

    let nonce = user.auth_nonce.clone().ok_or_else(|| {
        AppError::new(ErrorCode::ChallengeNotRequested, "no challenge pending")
    })?;

    let message = wallet_service::login_message(&nonce);
    let recovered = match wallet_service::recover_address(&message, &req.signature) {
        Ok(recovered) => recovered,
        Err(err) => {
            clear_nonce(&mut conn, user.id)?;
            return Err(err);
        }
    };

    if recovered != address {
        clear_nonce(&mut conn, user.id)?;
        tracing::warn!(user_id = %user.id, "wallet signature did not match claimed address");
        return Err(AppError::new(ErrorCode::VerificationFailed, "signature verification failed"));
    }

    clear_nonce(&mut conn, user.id)?;

    let role = user.role.parse::<UserRole>().unwrap_or(UserRole::User);
    let session = token_service::create_session_token(
        user.id,
        Some(address),
        role,
        &state.config.jwt_secret,
        state.config.jwt_ttl_secs,
    )?;

    tracing::info!(user_id = %user.id, "wallet login verified");

    Ok(Json(ApiResponse::ok(AuthResponse {
        session,
        user: user.into(),
    })))
}

fn clear_nonce(conn: &mut PgConnection, user_id: Uuid) -> AppResult<()> {
    diesel::update(users::table.find(user_id))
        .set(users::auth_nonce.eq(None::<String>))
        .execute(conn)?;
    Ok(())
}
