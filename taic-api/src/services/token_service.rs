use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use taic_shared::errors::AppError;
use taic_shared::types::auth::{Claims, SessionToken, UserRole};

/// Mint the session token for a user. Every issuance path goes through here
/// so the expiry policy stays uniform.
pub fn create_session_token(
    user_id: Uuid,
    wallet: Option<String>,
    role: UserRole,
    secret: &str,
    ttl_secs: i64,
) -> Result<SessionToken, AppError> {
    let claims = Claims::new(user_id, wallet, role, ttl_secs);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("JWT encoding failed: {e}")))?;
    Ok(SessionToken::new(token, ttl_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    fn decode_claims(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
    }

    #[test]
    fn roundtrip() {
        let user_id = Uuid::now_v7();
        let wallet = Some("0x8ba1f109551bd432803012645ac136ddd64dba72".to_string());
        let session =
            create_session_token(user_id, wallet.clone(), UserRole::User, "test-secret", 3600)
                .unwrap();

        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.expires_in, 3600);

        let claims = decode_claims(&session.token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.wallet, wallet);
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn bad_secret_rejects() {
        let session =
            create_session_token(Uuid::now_v7(), None, UserRole::Admin, "secret-a", 60).unwrap();
        assert!(decode_claims(&session.token, "secret-b").is_err());
    }

    #[test]
    fn expired_token_rejects() {
        let session =
            create_session_token(Uuid::now_v7(), None, UserRole::User, "secret", -120).unwrap();
        assert!(decode_claims(&session.token, "secret").is_err());
    }
}
