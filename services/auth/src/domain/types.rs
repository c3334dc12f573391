use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub account_locked: bool,
    pub enabled: bool,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// What a [`Token`] may be redeemed for. A code is only looked up under its own purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    AccountActivation,
    ForgotPassword,
}

impl TokenPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccountActivation => "ACCOUNT_ACTIVATION",
            Self::ForgotPassword => "FORGOT_PASSWORD",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenPurpose {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCOUNT_ACTIVATION" => Ok(Self::AccountActivation),
            "FORGOT_PASSWORD" => Ok(Self::ForgotPassword),
            other => Err(anyhow::anyhow!("unknown token purpose: {other}")),
        }
    }
}

/// One-time numeric code mailed to a user.
#[derive(Debug, Clone)]
pub struct Token {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub purpose: TokenPurpose,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set by activation or by reset-code verification.
    pub validated_at: Option<DateTime<Utc>>,
    /// Set once a password reset has been applied with this code.
    pub consumed_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Build a fresh, unverified token created at `now`.
    pub fn issue(user_id: Uuid, code: String, purpose: TokenPurpose, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            code,
            purpose,
            created_at: now,
            expires_at: now + Duration::minutes(TOKEN_TTL_MINUTES),
            validated_at: None,
            consumed_at: None,
        }
    }

    /// Expired strictly after `expires_at`; the boundary instant is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }
}

/// Which email body to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    ActivateAccount,
    ForgotPassword,
}

impl EmailTemplate {
    pub fn name(self) -> &'static str {
        match self {
            Self::ActivateAccount => "activate_account",
            Self::ForgotPassword => "forgot_password",
        }
    }
}

/// Outgoing code email.
#[derive(Debug, Clone)]
pub struct Mail {
    pub to: String,
    pub display_name: String,
    pub template: EmailTemplate,
    pub action_url: String,
    pub code: String,
    pub subject: String,
}

/// Role granted at registration.
pub const DEFAULT_ROLE: &str = "USER";

/// Number of digits in a code.
pub const TOKEN_CODE_LEN: usize = 6;

/// Code time-to-live in minutes.
pub const TOKEN_TTL_MINUTES: i64 = 15;

pub const ACTIVATION_SUBJECT: &str = "Account activation";

pub const PASSWORD_RESET_SUBJECT: &str = "Password reset request";
