#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{Mail, Token, TokenPurpose, User};
use crate::error::AuthServiceError;

/// Persistence for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    /// Insert a new user. Fails with `EmailAlreadyRegistered` on a duplicate email.
    async fn create(&self, user: &User) -> Result<(), AuthServiceError>;
}

/// Persistence for activation and password-reset codes.
pub trait TokenRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<Token>, AuthServiceError>;

    /// Most recently created token with this code and purpose.
    async fn find_by_code_and_purpose(
        &self,
        code: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<Token>, AuthServiceError>;

    async fn create(&self, token: &Token) -> Result<(), AuthServiceError>;

    /// Stamp `validated_at`.
    async fn mark_validated(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError>;

    /// Enable the user and stamp the token's `validated_at` in one transaction.
    async fn activate_account(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Stamp the token's `consumed_at` and store the new password hash in one transaction.
    ///
    /// Fails with `InvalidToken`, writing nothing, when the token was already consumed.
    async fn reset_password(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Delete tokens that expired before `before`. Returns the number removed.
    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64, AuthServiceError>;
}

/// Outbound email delivery.
pub trait Mailer: Send + Sync {
    /// Errors surface as `DeliveryFailure`; callers do not retry.
    async fn send(&self, mail: &Mail) -> Result<(), AuthServiceError>;
}

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, plain: &str) -> Result<String, AuthServiceError>;

    async fn matches(&self, plain: &str, hash: &str) -> bool;
}

/// Storage for uploaded user photos.
pub trait PhotoStore: Send + Sync {
    /// Returns the stored path relative to the storage root, or `None` on a soft failure.
    async fn save_user_photo(
        &self,
        user_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> Option<String>;
}
