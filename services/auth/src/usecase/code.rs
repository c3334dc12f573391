use chrono::Utc;
use rand::RngExt;
use tracing::{info, warn};

use crate::domain::repository::{Mailer, TokenRepository};
use crate::domain::types::{
    ACTIVATION_SUBJECT, EmailTemplate, Mail, TOKEN_CODE_LEN, Token, TokenPurpose, User,
};
use crate::error::AuthServiceError;

const DIGITS: &[u8] = b"0123456789";

/// Six independent, uniformly drawn digits from the thread-local CSPRNG.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_CODE_LEN)
        .map(|_| DIGITS[rng.random_range(0..DIGITS.len())] as char)
        .collect()
}

/// Create and persist a fresh code for `user`. Does not send anything.
///
/// Codes are not checked for uniqueness; a collision with an outstanding token is
/// logged and the code is issued anyway.
pub async fn issue_token<T: TokenRepository>(
    tokens: &T,
    user: &User,
    purpose: TokenPurpose,
) -> Result<Token, AuthServiceError> {
    let code = generate_code();
    if tokens.find_by_code(&code).await?.is_some() {
        warn!(user_id = %user.id, %purpose, "issued code collides with an existing token");
    }
    let token = Token::issue(user.id, code, purpose, Utc::now());
    tokens.create(&token).await?;
    Ok(token)
}

pub fn code_mail(
    user: &User,
    template: EmailTemplate,
    action_url: &str,
    code: &str,
    subject: &str,
) -> Mail {
    Mail {
        to: user.email.clone(),
        display_name: user.full_name(),
        template,
        action_url: action_url.to_owned(),
        code: code.to_owned(),
        subject: subject.to_owned(),
    }
}

/// Issue an activation code and email it. Used by registration and by expired activations.
pub async fn send_activation_code<T: TokenRepository, M: Mailer>(
    tokens: &T,
    mailer: &M,
    user: &User,
    activation_url: &str,
) -> Result<Token, AuthServiceError> {
    let token = issue_token(tokens, user, TokenPurpose::AccountActivation).await?;
    let mail = code_mail(
        user,
        EmailTemplate::ActivateAccount,
        activation_url,
        &token.code,
        ACTIVATION_SUBJECT,
    );
    mailer.send(&mail).await?;
    info!(email = %user.email, "activation email sent");
    Ok(token)
}
