use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use crate::errors::{AppError, ErrorCode};

const ADMIN_KEY_HEADER: &str = "X-Admin-API-Key";

/// Gate for admin endpoints: the `X-Admin-API-Key` header must hash to the
/// digest stored server-side. Only the SHA-256 of the key ever touches the
/// environment or logs.
pub struct AdminApiKey;

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminApiKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::new(ErrorCode::AdminKeyMissing, "missing admin API key"))?;

        let expected_hex = std::env::var("ADMIN_API_KEY_HASH")
            .map_err(|_| AppError::internal("admin API key not configured"))?;

        if !verify_admin_key(presented, &expected_hex) {
            return Err(AppError::new(ErrorCode::AdminKeyInvalid, "invalid admin API key"));
        }

        Ok(Self)
    }
}

/// Compare SHA-256(presented) against the stored hex digest.
pub fn verify_admin_key(presented: &str, expected_hex: &str) -> bool {
    let digest = Sha256::digest(presented.as_bytes());
    let digest_hex = hex::encode(digest);
    // Constant-time comparison.
    use subtle::ConstantTimeEq;
    digest_hex.as_bytes().ct_eq(expected_hex.to_lowercase().as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_hex(key: &str) -> String {
        hex::encode(Sha256::digest(key.as_bytes()))
    }

    #[test]
    fn exact_key_matches() {
        let expected = hash_hex("super-secret-admin-key");
        assert!(verify_admin_key("super-secret-admin-key", &expected));
    }

    #[test]
    fn wrong_key_rejected() {
        let expected = hash_hex("super-secret-admin-key");
        assert!(!verify_admin_key("super-secret-admin-kez", &expected));
        assert!(!verify_admin_key("", &expected));
    }

    #[test]
    fn digest_case_insensitive() {
        let expected = hash_hex("k").to_uppercase();
        assert!(verify_admin_key("k", &expected));
    }
}
