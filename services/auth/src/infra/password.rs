use anyhow::{Context as _, anyhow};
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};
use tracing::{error, warn};

use crate::domain::repository::CredentialHasher;
use crate::error::AuthServiceError;

/// Argon2id with default parameters, stored as PHC strings.
///
/// Hashing and verification run on the blocking pool.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

fn hash_blocking(argon2: &Argon2<'_>, plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

fn matches_blocking(argon2: &Argon2<'_>, plain: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("stored password hash is not a valid PHC string");
        return false;
    };
    argon2.verify_password(plain.as_bytes(), &parsed).is_ok()
}

impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plain: &str) -> Result<String, AuthServiceError> {
        let argon2 = self.argon2.clone();
        let plain = plain.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_blocking(&argon2, &plain))
            .await
            .context("password hashing task")??;
        Ok(hash)
    }

    async fn matches(&self, plain: &str, hash: &str) -> bool {
        let argon2 = self.argon2.clone();
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        match tokio::task::spawn_blocking(move || matches_blocking(&argon2, &plain, &hash)).await {
            Ok(matched) => matched,
            Err(e) => {
                error!(error = %e, "password verification task failed");
                false
            }
        }
    }
}
