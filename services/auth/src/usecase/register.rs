use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::{CredentialHasher, Mailer, TokenRepository, UserRepository};
use crate::domain::types::{DEFAULT_ROLE, User};
use crate::error::AuthServiceError;
use crate::usecase::code::send_activation_code;

pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<U, T, M, H>
where
    U: UserRepository,
    T: TokenRepository,
    M: Mailer,
    H: CredentialHasher,
{
    pub users: U,
    pub tokens: T,
    pub mailer: M,
    pub hasher: H,
    pub activation_url: String,
}

impl<U, T, M, H> RegisterUseCase<U, T, M, H>
where
    U: UserRepository,
    T: TokenRepository,
    M: Mailer,
    H: CredentialHasher,
{
    /// Create a disabled account and mail its activation code.
    pub async fn execute(&self, input: RegisterInput) -> Result<User, AuthServiceError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash: self.hasher.hash(&input.password).await?,
            account_locked: false,
            enabled: false,
            role: DEFAULT_ROLE.to_owned(),
            created_at: now,
            updated_at: now,
        };

        self.users.create(&user).await?;
        info!(email = %user.email, "registration successful");

        send_activation_code(&self.tokens, &self.mailer, &user, &self.activation_url).await?;
        Ok(user)
    }
}
