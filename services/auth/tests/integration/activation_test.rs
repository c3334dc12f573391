use chrono::{Duration, Utc};

use booknet_auth::domain::types::{EmailTemplate, Token, TokenPurpose};
use booknet_auth::error::AuthServiceError;
use booknet_auth::usecase::activation::ActivateAccountUseCase;

use crate::helpers::{
    MockMailer, MockTokenRepo, MockUserRepo, TEST_ACTIVATION_URL, disabled_user, fresh_token,
    token_issued_ago,
};

fn usecase(
    users: MockUserRepo,
    tokens: Vec<Token>,
    mailer: MockMailer,
) -> ActivateAccountUseCase<MockUserRepo, MockTokenRepo, MockMailer> {
    let tokens = MockTokenRepo::new(tokens, &users);
    ActivateAccountUseCase {
        users,
        tokens,
        mailer,
        activation_url: TEST_ACTIVATION_URL.to_owned(),
    }
}

#[tokio::test]
async fn should_enable_user_with_valid_code() {
    let user = disabled_user();
    let token = fresh_token(user.id, "123456", TokenPurpose::AccountActivation);
    let uc = usecase(MockUserRepo::new(vec![user]), vec![token], MockMailer::new());
    let users = uc.users.users_handle();
    let tokens = uc.tokens.codes_handle();

    uc.execute("123456").await.unwrap();

    assert!(users.lock().unwrap()[0].enabled);
    assert!(tokens.lock().unwrap()[0].validated_at.is_some());
}

#[tokio::test]
async fn should_reject_unknown_code() {
    let user = disabled_user();
    let token = fresh_token(user.id, "123456", TokenPurpose::AccountActivation);
    let uc = usecase(MockUserRepo::new(vec![user]), vec![token], MockMailer::new());

    let result = uc.execute("654321").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_redeem_reset_code_as_activation() {
    let user = disabled_user();
    let token = fresh_token(user.id, "123456", TokenPurpose::ForgotPassword);
    let uc = usecase(MockUserRepo::new(vec![user]), vec![token], MockMailer::new());
    let users = uc.users.users_handle();

    let result = uc.execute("123456").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
    assert!(!users.lock().unwrap()[0].enabled);
}

#[tokio::test]
async fn should_mail_a_new_code_when_expired() {
    let user = disabled_user();
    let user_id = user.id;
    let expired = token_issued_ago(
        user_id,
        "123456",
        TokenPurpose::AccountActivation,
        Duration::minutes(20),
    );
    let expired_id = expired.id;
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();
    let uc = usecase(MockUserRepo::new(vec![user]), vec![expired], mailer);
    let users = uc.users.users_handle();
    let tokens = uc.tokens.codes_handle();

    let result = uc.execute("123456").await;

    assert!(
        matches!(result, Err(AuthServiceError::ExpiredToken)),
        "expected ExpiredToken, got {result:?}"
    );
    assert!(!users.lock().unwrap()[0].enabled);

    let tokens = tokens.lock().unwrap();
    assert_eq!(tokens.len(), 2);
    let replacement = tokens.iter().find(|t| t.id != expired_id).unwrap();
    assert_eq!(replacement.user_id, user_id);
    assert_eq!(replacement.purpose, TokenPurpose::AccountActivation);
    assert!(!replacement.is_expired_at(Utc::now()));

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template, EmailTemplate::ActivateAccount);
    assert_eq!(sent[0].code, replacement.code);
}

#[tokio::test]
async fn should_surface_delivery_failure_when_replacing_expired_code() {
    let user = disabled_user();
    let expired = token_issued_ago(
        user.id,
        "123456",
        TokenPurpose::AccountActivation,
        Duration::minutes(20),
    );
    let uc = usecase(MockUserRepo::new(vec![user]), vec![expired], MockMailer::failing());

    let result = uc.execute("123456").await;
    assert!(
        matches!(result, Err(AuthServiceError::DeliveryFailure(_))),
        "expected DeliveryFailure, got {result:?}"
    );
}

#[tokio::test]
async fn should_accept_the_same_code_twice() {
    let user = disabled_user();
    let token = fresh_token(user.id, "123456", TokenPurpose::AccountActivation);
    let uc = usecase(MockUserRepo::new(vec![user]), vec![token], MockMailer::new());
    let users = uc.users.users_handle();

    uc.execute("123456").await.unwrap();
    uc.execute("123456").await.unwrap();

    assert!(users.lock().unwrap()[0].enabled);
}

#[tokio::test]
async fn should_return_user_not_found_for_orphaned_token() {
    let token = fresh_token(uuid::Uuid::now_v7(), "123456", TokenPurpose::AccountActivation);
    let uc = usecase(MockUserRepo::empty(), vec![token], MockMailer::new());

    let result = uc.execute("123456").await;
    assert!(
        matches!(result, Err(AuthServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_user_not_found_for_expired_orphaned_token() {
    let expired = token_issued_ago(
        uuid::Uuid::now_v7(),
        "123456",
        TokenPurpose::AccountActivation,
        Duration::minutes(20),
    );
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();
    let uc = usecase(MockUserRepo::empty(), vec![expired], mailer);
    let tokens = uc.tokens.codes_handle();

    let result = uc.execute("123456").await;

    assert!(
        matches!(result, Err(AuthServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
    assert_eq!(tokens.lock().unwrap().len(), 1);
    assert!(sent.lock().unwrap().is_empty());
}
