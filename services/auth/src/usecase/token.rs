use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use booknet_auth_types::token::{JwtClaims, sign_token};

use crate::domain::repository::{CredentialHasher, UserRepository};
use crate::domain::types::User;
use crate::error::AuthServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Mints signed JWTs for authenticated users.
#[derive(Clone)]
pub struct JwtIssuer {
    pub secret: String,
    pub ttl_secs: u64,
}

impl JwtIssuer {
    /// `sub` is the user's email; `fullName` and `authorities` ride along as claims.
    pub fn mint(&self, user: &User) -> Result<String, AuthServiceError> {
        let iat = now_secs();
        let claims = JwtClaims {
            sub: user.email.clone(),
            full_name: user.full_name(),
            authorities: vec![user.role.clone()],
            iat,
            exp: iat + self.ttl_secs,
        };
        sign_token(&claims, &self.secret).map_err(|e| AuthServiceError::Internal(e.into()))
    }
}

// ── Authenticate (login) ──────────────────────────────────────────────────────

pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct AuthenticateOutput {
    pub token: String,
}

pub struct AuthenticateUseCase<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    pub users: U,
    pub hasher: H,
    pub issuer: JwtIssuer,
}

impl<U, H> AuthenticateUseCase<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    /// Unknown email and wrong password both answer `BadCredentials`.
    /// Account state is only revealed once the password matched.
    pub async fn execute(
        &self,
        input: AuthenticateInput,
    ) -> Result<AuthenticateOutput, AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::BadCredentials)?;

        if !self
            .hasher
            .matches(&input.password, &user.password_hash)
            .await
        {
            warn!(email = %input.email, "bad credentials");
            return Err(AuthServiceError::BadCredentials);
        }
        if user.account_locked {
            return Err(AuthServiceError::AccountLocked);
        }
        if !user.enabled {
            return Err(AuthServiceError::AccountDisabled);
        }

        let token = self.issuer.mint(&user)?;
        info!(email = %user.email, "user authenticated");
        Ok(AuthenticateOutput { token })
    }
}
