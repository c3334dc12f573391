use chrono::{Duration, Utc};
use tracing::info;

use crate::domain::repository::TokenRepository;
use crate::error::AuthServiceError;

pub struct PurgeExpiredTokensUseCase<T: TokenRepository> {
    pub tokens: T,
    /// Expired tokens younger than this are kept so an expired activation code can still
    /// trigger a replacement.
    pub retention: Duration,
}

impl<T: TokenRepository> PurgeExpiredTokensUseCase<T> {
    pub async fn execute(&self) -> Result<u64, AuthServiceError> {
        let cutoff = Utc::now() - self.retention;
        let removed = self.tokens.purge_expired(cutoff).await?;
        if removed > 0 {
            info!(removed, %cutoff, "purged expired tokens");
        }
        Ok(removed)
    }
}
