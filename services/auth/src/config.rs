use std::time::Duration;

use anyhow::{anyhow, bail};
use chrono::TimeDelta;
use serde::Deserialize;

use booknet_core::config::Config;

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWTs.
    pub jwt_secret: String,
    /// JWT lifetime in seconds (default one day). Env var: `JWT_EXPIRATION_SECS`.
    #[serde(default = "default_jwt_expiration_secs")]
    pub jwt_expiration_secs: u64,
    /// TCP port to listen on (default 8088). Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// Frontend page that redeems activation codes.
    #[serde(default = "default_activation_url")]
    pub activation_url: String,
    /// Frontend page that redeems password-reset codes.
    #[serde(default = "default_reset_url")]
    pub reset_url: String,
    /// Sender address for code emails.
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    /// SMTP relay host. When unset, emails are only logged.
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// Require STARTTLS to the relay (default false for a local catcher).
    #[serde(default)]
    pub smtp_tls: bool,
    /// Root directory for uploaded photos.
    #[serde(default = "default_photos_output_path")]
    pub photos_output_path: String,
    /// How long expired tokens are kept before the reaper deletes them.
    #[serde(default = "default_token_retention_secs")]
    pub token_retention_secs: u64,
    /// Reaper period.
    #[serde(default = "default_token_purge_interval_secs")]
    pub token_purge_interval_secs: u64,
}

impl Config for AuthConfig {}

impl AuthConfig {
    /// `TOKEN_RETENTION_SECS` as a signed delta; rejects values chrono cannot represent.
    pub fn token_retention(&self) -> anyhow::Result<TimeDelta> {
        i64::try_from(self.token_retention_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                anyhow!(
                    "TOKEN_RETENTION_SECS out of range: {}",
                    self.token_retention_secs
                )
            })
    }

    /// `TOKEN_PURGE_INTERVAL_SECS` as a tick period; zero is rejected.
    pub fn token_purge_interval(&self) -> anyhow::Result<Duration> {
        if self.token_purge_interval_secs == 0 {
            bail!("TOKEN_PURGE_INTERVAL_SECS must be greater than zero");
        }
        Ok(Duration::from_secs(self.token_purge_interval_secs))
    }
}

fn default_jwt_expiration_secs() -> u64 {
    86_400
}

fn default_auth_port() -> u16 {
    8088
}

fn default_activation_url() -> String {
    "http://localhost:4200/activate-account".to_owned()
}

fn default_reset_url() -> String {
    "http://localhost:4200/reset-password".to_owned()
}

fn default_mail_from() -> String {
    "Booknet <no-reply@booknet.local>".to_owned()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_photos_output_path() -> String {
    "./uploads".to_owned()
}

fn default_token_retention_secs() -> u64 {
    86_400
}

fn default_token_purge_interval_secs() -> u64 {
    3_600
}
