use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use taic_shared::errors::{AppError, AppResult};
use taic_shared::types::auth::UserRole;
use taic_shared::types::ApiResponse;

use crate::models::{NewUser, User};
use crate::schema::users;
use crate::services::{auth_service, wallet_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    pub wallet_address: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub message: String,
    pub nonce: String,
}

/// Issue a signing challenge for a wallet. An unknown address provisions a
/// wallet-only account on the spot: connecting a wallet for the first time
/// IS registration in this flow. Repeating the request simply replaces the
/// previous nonce.
pub async fn challenge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChallengeRequest>,
) -> AppResult<Json<ApiResponse<ChallengeResponse>>> {
    let address = wallet_service::normalize_address(&req.wallet_address)?;
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let existing: Option<User> = users::table
        .filter(users::wallet_address.eq(&address))
        .first(&mut conn)
        .optional()?;

    let user = match existing {
        Some(user) => user,
        None => {
            let new_user = NewUser {
                email: None,
                password_hash: auth_service::WALLET_AUTH_SENTINEL.to_string(),
                display_name: None,
                wallet_address: Some(address.clone()),
                role: UserRole::User.to_string(),
            };
            let user: User = diesel::insert_into(users::table)
                .values(&new_user)
                .get_result(&mut conn)?;
            tracing::info!(user_id = %user.id, "wallet-only account provisioned");
            user
        }
    };

    let nonce = wallet_service::generate_nonce();
    diesel::update(users::table.find(user.id))
        .set(users::auth_nonce.eq(Some(nonce.clone())))
        .execute(&mut conn)?;

    tracing::debug!(user_id = %user.id, "challenge issued");

    Ok(Json(ApiResponse::ok(ChallengeResponse {
        message: wallet_service::login_message(&nonce),
        nonce,
    })))
}
