use chrono::Utc;
use tracing::{info, warn};

use crate::domain::repository::{Mailer, TokenRepository, UserRepository};
use crate::domain::types::{Token, TokenPurpose, User};
use crate::error::AuthServiceError;
use crate::usecase::code::send_activation_code;

pub struct ActivateAccountUseCase<U, T, M>
where
    U: UserRepository,
    T: TokenRepository,
    M: Mailer,
{
    pub users: U,
    pub tokens: T,
    pub mailer: M,
    pub activation_url: String,
}

impl<U, T, M> ActivateAccountUseCase<U, T, M>
where
    U: UserRepository,
    T: TokenRepository,
    M: Mailer,
{
    /// Redeem an activation code.
    ///
    /// An expired code is answered with a freshly mailed replacement and `ExpiredToken`;
    /// the expired token itself is left as is. Redeeming the same valid code twice
    /// enables the account twice.
    pub async fn execute(&self, code: &str) -> Result<(), AuthServiceError> {
        let token = self
            .tokens
            .find_by_code_and_purpose(code, TokenPurpose::AccountActivation)
            .await?
            .ok_or_else(|| {
                warn!("invalid activation code");
                AuthServiceError::InvalidToken
            })?;

        let now = Utc::now();
        if token.is_expired_at(now) {
            let user = self.owner(&token).await?;
            warn!(email = %user.email, "expired activation code, sending a new one");
            send_activation_code(&self.tokens, &self.mailer, &user, &self.activation_url).await?;
            return Err(AuthServiceError::ExpiredToken);
        }

        let user = self.owner(&token).await?;
        self.tokens.activate_account(token.id, user.id, now).await?;
        info!(email = %user.email, "account activated");
        Ok(())
    }

    async fn owner(&self, token: &Token) -> Result<User, AuthServiceError> {
        self.users.find_by_id(token.user_id).await?.ok_or_else(|| {
            warn!(user_id = %token.user_id, "no user found for activation token");
            AuthServiceError::UserNotFound
        })
    }
}
