use chrono::Utc;
use tracing::{info, warn};

use crate::domain::repository::{CredentialHasher, Mailer, TokenRepository, UserRepository};
use crate::domain::types::{EmailTemplate, PASSWORD_RESET_SUBJECT, Token, TokenPurpose};
use crate::error::AuthServiceError;
use crate::usecase::code::{code_mail, issue_token};

/// Look up an unconsumed reset token. Consumed codes read as invalid.
async fn find_reset_token<T: TokenRepository>(
    tokens: &T,
    code: &str,
) -> Result<Token, AuthServiceError> {
    let token = tokens
        .find_by_code_and_purpose(code, TokenPurpose::ForgotPassword)
        .await?
        .ok_or_else(|| {
            warn!("invalid password reset code");
            AuthServiceError::InvalidToken
        })?;
    if token.is_consumed() {
        warn!(user_id = %token.user_id, "password reset code already used");
        return Err(AuthServiceError::InvalidToken);
    }
    Ok(token)
}

// ── ForgotPassword ───────────────────────────────────────────────────────────

pub struct ForgotPasswordUseCase<U, T, M>
where
    U: UserRepository,
    T: TokenRepository,
    M: Mailer,
{
    pub users: U,
    pub tokens: T,
    pub mailer: M,
    pub reset_url: String,
}

impl<U, T, M> ForgotPasswordUseCase<U, T, M>
where
    U: UserRepository,
    T: TokenRepository,
    M: Mailer,
{
    pub async fn execute(&self, email: &str) -> Result<(), AuthServiceError> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            warn!(%email, "no user found for password reset");
            AuthServiceError::UserNotFound
        })?;

        let token = issue_token(&self.tokens, &user, TokenPurpose::ForgotPassword).await?;
        let mail = code_mail(
            &user,
            EmailTemplate::ForgotPassword,
            &self.reset_url,
            &token.code,
            PASSWORD_RESET_SUBJECT,
        );
        self.mailer.send(&mail).await?;

        info!(email = %user.email, "password reset email sent");
        Ok(())
    }
}

// ── VerifyResetCode ──────────────────────────────────────────────────────────

pub struct VerifyResetCodeUseCase<T: TokenRepository> {
    pub tokens: T,
}

impl<T: TokenRepository> VerifyResetCodeUseCase<T> {
    /// Confirm the mailed code. Required before `ResetPasswordUseCase` will accept it.
    /// Unlike activation, an expired code is not replaced.
    pub async fn execute(&self, code: &str) -> Result<(), AuthServiceError> {
        let token = find_reset_token(&self.tokens, code).await?;

        let now = Utc::now();
        if token.is_expired_at(now) {
            warn!(user_id = %token.user_id, "expired password reset code");
            return Err(AuthServiceError::ExpiredToken);
        }

        self.tokens.mark_validated(token.id, now).await?;
        info!(user_id = %token.user_id, "password reset code verified");
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub struct ResetPasswordUseCase<T, H>
where
    T: TokenRepository,
    H: CredentialHasher,
{
    pub tokens: T,
    pub hasher: H,
}

impl<T, H> ResetPasswordUseCase<T, H>
where
    T: TokenRepository,
    H: CredentialHasher,
{
    /// Apply a new password with a verified, unexpired code. The code is consumed on success.
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AuthServiceError> {
        if input.new_password != input.confirm_password {
            warn!("password confirmation mismatch");
            return Err(AuthServiceError::PasswordMismatch);
        }

        let token = find_reset_token(&self.tokens, &input.code).await?;

        let now = Utc::now();
        if token.is_expired_at(now) {
            warn!(user_id = %token.user_id, "expired password reset code");
            return Err(AuthServiceError::ExpiredToken);
        }
        if !token.is_validated() {
            warn!(user_id = %token.user_id, "password reset code not verified");
            return Err(AuthServiceError::CodeNotVerified);
        }

        let password_hash = self.hasher.hash(&input.new_password).await?;
        // A concurrent reset may have consumed the code since the lookup.
        self.tokens
            .reset_password(token.id, token.user_id, &password_hash, now)
            .await
            .inspect_err(|e| {
                if matches!(e, AuthServiceError::InvalidToken) {
                    warn!(user_id = %token.user_id, "password reset code already used");
                }
            })?;

        info!(user_id = %token.user_id, "password updated");
        Ok(())
    }
}
