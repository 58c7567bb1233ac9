use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Merchant,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Merchant => write!(f, "merchant"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "merchant" => Ok(UserRole::Merchant),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Session token claims. `wallet` is set for users who authenticated (or can
/// authenticate) with a wallet signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

impl Claims {
    pub fn new(user_id: Uuid, wallet: Option<String>, role: UserRole, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            wallet,
            role,
            iat: now,
            exp: now + duration_secs,
            jti: Uuid::now_v7(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub wallet: Option<String>,
    pub role: UserRole,
    pub token_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            wallet: claims.wallet,
            role: claims.role,
            token_id: claims.jti,
        }
    }
}

/// Single bearer session token, one expiry policy for every issuance path.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl SessionToken {
    pub fn new(token: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        for role in [UserRole::User, UserRole::Merchant, UserRole::Admin] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn claims_expiry_window() {
        let claims = Claims::new(Uuid::now_v7(), None, UserRole::User, 3600);
        assert_eq!(claims.exp, claims.iat + 3600);
        assert!(!claims.is_expired());

        let stale = Claims::new(Uuid::now_v7(), None, UserRole::User, -10);
        assert!(stale.is_expired());
    }

    #[test]
    fn wallet_claim_carried_to_auth_user() {
        let claims = Claims::new(
            Uuid::now_v7(),
            Some("0xabc0000000000000000000000000000000000def".into()),
            UserRole::Merchant,
            60,
        );
        let user = AuthUser::from(claims.clone());
        assert_eq!(user.wallet.as_deref(), claims.wallet.as_deref());
        assert_eq!(user.role, UserRole::Merchant);
    }
}
