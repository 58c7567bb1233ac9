use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Auth errors
/// - E2xxx: Staking errors
/// - E3xxx: Admin errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    Conflict,

    // Auth (E1xxx)
    InvalidCredentials,
    EmailAlreadyExists,
    TokenExpired,
    TokenInvalid,
    InvalidWalletAddress,
    SignatureMalformed,
    VerificationFailed,
    ChallengeNotRequested,
    WalletNotFound,

    // Staking (E2xxx)
    StakeNotFound,
    StakeNotOwned,
    StakeAlreadyUnstaked,
    InsufficientBalance,
    InvalidAmount,

    // Admin (E3xxx)
    AdminKeyMissing,
    AdminKeyInvalid,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::BadRequest => "E0006",
            Self::Conflict => "E0007",

            // Auth
            Self::InvalidCredentials => "E1001",
            Self::EmailAlreadyExists => "E1002",
            Self::TokenExpired => "E1003",
            Self::TokenInvalid => "E1004",
            Self::InvalidWalletAddress => "E1005",
            Self::SignatureMalformed => "E1006",
            Self::VerificationFailed => "E1007",
            Self::ChallengeNotRequested => "E1008",
            Self::WalletNotFound => "E1009",

            // Staking
            Self::StakeNotFound => "E2001",
            Self::StakeNotOwned => "E2002",
            Self::StakeAlreadyUnstaked => "E2003",
            Self::InsufficientBalance => "E2004",
            Self::InvalidAmount => "E2005",

            // Admin
            Self::AdminKeyMissing => "E3001",
            Self::AdminKeyInvalid => "E3002",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidWalletAddress
            | Self::SignatureMalformed | Self::InsufficientBalance
            | Self::InvalidAmount => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::WalletNotFound | Self::StakeNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials | Self::TokenExpired
            | Self::TokenInvalid | Self::VerificationFailed
            | Self::AdminKeyMissing => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::ChallengeNotRequested | Self::StakeNotOwned
            | Self::AdminKeyInvalid => StatusCode::FORBIDDEN,
            Self::Conflict | Self::EmailAlreadyExists
            | Self::StakeAlreadyUnstaked => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn known_error_envelope() {
        let value = body_json(AppError::new(
            ErrorCode::ChallengeNotRequested,
            "no challenge pending",
        ))
        .await;

        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "E1008");
        assert_eq!(value["error"]["message"], "no challenge pending");
    }

    #[tokio::test]
    async fn status_codes() {
        let cases = [
            (ErrorCode::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ErrorCode::ChallengeNotRequested, StatusCode::FORBIDDEN),
            (ErrorCode::WalletNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::SignatureMalformed, StatusCode::BAD_REQUEST),
            (ErrorCode::StakeAlreadyUnstaked, StatusCode::CONFLICT),
            (ErrorCode::AdminKeyInvalid, StatusCode::FORBIDDEN),
        ];
        for (code, status) in cases {
            assert_eq!(code.status_code(), status, "{:?}", code);
        }
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let err = AppError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"));
        let value = body_json(err).await;

        assert_eq!(value["error"]["code"], "E0001");
        assert_eq!(value["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn diesel_not_found_maps_to_404() {
        let err = AppError::Database(diesel::result::Error::NotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
