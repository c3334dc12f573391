use std::path::PathBuf;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use booknet_auth_types::identity::JwtSecret;

use crate::infra::db::{DbTokenRepository, DbUserRepository};
use crate::infra::mail::AppMailer;
use crate::infra::password::Argon2Hasher;
use crate::infra::storage::LocalPhotoStore;
use crate::usecase::token::JwtIssuer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: AppMailer,
    pub hasher: Argon2Hasher,
    pub jwt_secret: JwtSecret,
    pub jwt_expiration_secs: u64,
    pub activation_url: String,
    pub reset_url: String,
    pub photos_root: PathBuf,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_repo(&self) -> DbTokenRepository {
        DbTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn jwt_issuer(&self) -> JwtIssuer {
        JwtIssuer {
            secret: self.jwt_secret.0.to_string(),
            ttl_secs: self.jwt_expiration_secs,
        }
    }

    pub fn photo_store(&self) -> LocalPhotoStore {
        LocalPhotoStore::new(self.photos_root.clone())
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}
