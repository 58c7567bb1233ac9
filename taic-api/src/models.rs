use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{stakes, users};

// --- Users ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub wallet_address: Option<String>,
    #[serde(skip_serializing)]
    pub auth_nonce: Option<String>,
    pub role: String,
    pub balance: i64,
    pub staked_balance: i64,
    pub cashback_balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: Option<String>,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub wallet_address: Option<String>,
    pub role: String,
}

/// User fields safe to return to any authenticated caller.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub wallet_address: Option<String>,
    pub role: String,
    pub balance: i64,
    pub staked_balance: i64,
    pub cashback_balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            wallet_address: user.wallet_address,
            role: user.role,
            balance: user.balance,
            staked_balance: user.staked_balance,
            cashback_balance: user.cashback_balance,
            created_at: user.created_at,
        }
    }
}

// --- Stakes ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = stakes)]
pub struct Stake {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub unstaked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = stakes)]
pub struct NewStake {
    pub user_id: Uuid,
    pub amount: i64,
    pub status: String,
}
