use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::activation::ActivateAccountUseCase;
use crate::usecase::password_reset::{
    ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase, VerifyResetCodeUseCase,
};
use crate::usecase::register::{RegisterInput, RegisterUseCase};
use crate::usecase::token::{AuthenticateInput, AuthenticateUseCase};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn message(message: &'static str) -> Json<MessageResponse> {
    Json(MessageResponse { message })
}

/// Body carrying a mailed code.
#[derive(Deserialize)]
pub struct CodeRequest {
    pub token: String,
}

// ── POST /auth/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
        mailer: state.mailer.clone(),
        hasher: state.hasher.clone(),
        activation_url: state.activation_url.clone(),
    };
    usecase
        .execute(RegisterInput {
            first_name: body.firstname,
            last_name: body.lastname,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(StatusCode::ACCEPTED)
}

// ── POST /auth/authenticate ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthenticateResponse {
    pub token: String,
}

pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequest>,
) -> Result<Json<AuthenticateResponse>, AuthServiceError> {
    let usecase = AuthenticateUseCase {
        users: state.user_repo(),
        hasher: state.hasher.clone(),
        issuer: state.jwt_issuer(),
    };
    let out = usecase
        .execute(AuthenticateInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(AuthenticateResponse { token: out.token }))
}

// ── POST /auth/activate-account ───────────────────────────────────────────────

pub async fn activate_account(
    State(state): State<AppState>,
    Json(body): Json<CodeRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = ActivateAccountUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
        mailer: state.mailer.clone(),
        activation_url: state.activation_url.clone(),
    };
    usecase.execute(&body.token).await?;
    Ok(message("Account activated"))
}

// ── POST /auth/forgot-password ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = ForgotPasswordUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
        mailer: state.mailer.clone(),
        reset_url: state.reset_url.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok(message("Reset password instructions sent to your email"))
}

// ── POST /auth/verify-reset-code ──────────────────────────────────────────────

pub async fn verify_reset_code(
    State(state): State<AppState>,
    Json(body): Json<CodeRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = VerifyResetCodeUseCase {
        tokens: state.token_repo(),
    };
    usecase.execute(&body.token).await?;
    Ok(message("Code verified"))
}

// ── POST /auth/reset-password ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = ResetPasswordUseCase {
        tokens: state.token_repo(),
        hasher: state.hasher.clone(),
    };
    usecase
        .execute(ResetPasswordInput {
            code: body.token,
            new_password: body.new_password,
            confirm_password: body.confirm_password,
        })
        .await?;
    Ok(message("Password reset successful"))
}
