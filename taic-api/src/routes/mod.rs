pub mod admin;
pub mod challenge;
pub mod health;
pub mod login;
pub mod me;
pub mod register;
pub mod staking;
pub mod verify;

use serde::Serialize;

use taic_shared::types::auth::SessionToken;

use crate::models::PublicUser;

/// Body returned by every authentication endpoint: the session token fields
/// plus the public user record.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub session: SessionToken,
    pub user: PublicUser,
}
