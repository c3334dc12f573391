use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("code not verified")]
    CodeNotVerified,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("user not found")]
    UserNotFound,
    #[error("bad credentials")]
    BadCredentials,
    #[error("account disabled")]
    AccountDisabled,
    #[error("account locked")]
    AccountLocked,
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("invalid upload")]
    InvalidUpload,
    #[error("email delivery failed")]
    DeliveryFailure(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::CodeNotVerified => "CODE_NOT_VERIFIED",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::BadCredentials => "BAD_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::InvalidUpload => "INVALID_UPLOAD",
            Self::DeliveryFailure(_) => "DELIVERY_FAILURE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidToken
            | Self::ExpiredToken
            | Self::PasswordMismatch
            | Self::InvalidUpload => StatusCode::BAD_REQUEST,
            Self::CodeNotVerified | Self::AccountDisabled => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::BadCredentials => StatusCode::UNAUTHORIZED,
            Self::AccountLocked => StatusCode::LOCKED,
            Self::EmailAlreadyRegistered => StatusCode::CONFLICT,
            Self::DeliveryFailure(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and TraceLayer already records them.
        // Server-side failures get their anyhow chain logged.
        match &self {
            Self::Internal(e) => tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error"),
            Self::DeliveryFailure(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = "DELIVERY_FAILURE", "email delivery failed")
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
