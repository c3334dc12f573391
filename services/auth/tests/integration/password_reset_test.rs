use chrono::{Duration, Utc};

use booknet_auth::domain::types::{EmailTemplate, Token, TokenPurpose};
use booknet_auth::error::AuthServiceError;
use booknet_auth::usecase::password_reset::{
    ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase, VerifyResetCodeUseCase,
};

use crate::helpers::{
    MockHasher, MockMailer, MockTokenRepo, MockUserRepo, TEST_PASSWORD, TEST_RESET_URL,
    fresh_token, test_user, token_issued_ago,
};

fn verified(mut token: Token) -> Token {
    token.validated_at = Some(token.created_at);
    token
}

fn reset_input(code: &str, new_password: &str, confirm_password: &str) -> ResetPasswordInput {
    ResetPasswordInput {
        code: code.to_owned(),
        new_password: new_password.to_owned(),
        confirm_password: confirm_password.to_owned(),
    }
}

// ── ForgotPasswordUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_mail_reset_code_to_known_user() {
    let user = test_user();
    let user_id = user.id;
    let users = MockUserRepo::new(vec![user]);
    let tokens = MockTokenRepo::new(vec![], &users);
    let codes = tokens.codes_handle();
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();
    let uc = ForgotPasswordUseCase {
        users,
        tokens,
        mailer,
        reset_url: TEST_RESET_URL.to_owned(),
    };

    uc.execute("ada@booknet.test").await.unwrap();

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].user_id, user_id);
    assert_eq!(codes[0].purpose, TokenPurpose::ForgotPassword);
    assert!(codes[0].validated_at.is_none());
    assert_eq!(codes[0].expires_at - codes[0].created_at, Duration::minutes(15));

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template, EmailTemplate::ForgotPassword);
    assert_eq!(sent[0].subject, "Password reset request");
    assert_eq!(sent[0].action_url, TEST_RESET_URL);
    assert_eq!(sent[0].code, codes[0].code);
}

#[tokio::test]
async fn should_return_user_not_found_for_unknown_email() {
    let users = MockUserRepo::empty();
    let tokens = MockTokenRepo::new(vec![], &users);
    let codes = tokens.codes_handle();
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();
    let uc = ForgotPasswordUseCase {
        users,
        tokens,
        mailer,
        reset_url: TEST_RESET_URL.to_owned(),
    };

    let result = uc.execute("nobody@booknet.test").await;

    assert!(
        matches!(result, Err(AuthServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
    assert!(codes.lock().unwrap().is_empty());
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_surface_delivery_failure_for_reset_mail() {
    let users = MockUserRepo::new(vec![test_user()]);
    let tokens = MockTokenRepo::new(vec![], &users);
    let uc = ForgotPasswordUseCase {
        users,
        tokens,
        mailer: MockMailer::failing(),
        reset_url: TEST_RESET_URL.to_owned(),
    };

    let result = uc.execute("ada@booknet.test").await;
    assert!(
        matches!(result, Err(AuthServiceError::DeliveryFailure(_))),
        "expected DeliveryFailure, got {result:?}"
    );
}

// ── VerifyResetCodeUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_reset_code_verified() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = MockTokenRepo::new(
        vec![fresh_token(user.id, "424242", TokenPurpose::ForgotPassword)],
        &users,
    );
    let codes = tokens.codes_handle();
    let uc = VerifyResetCodeUseCase { tokens };

    uc.execute("424242").await.unwrap();

    assert!(codes.lock().unwrap()[0].is_validated());
}

#[tokio::test]
async fn should_reject_expired_reset_code_without_reissuing() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = MockTokenRepo::new(
        vec![token_issued_ago(
            user.id,
            "424242",
            TokenPurpose::ForgotPassword,
            Duration::minutes(20),
        )],
        &users,
    );
    let codes = tokens.codes_handle();
    let uc = VerifyResetCodeUseCase { tokens };

    let result = uc.execute("424242").await;

    assert!(
        matches!(result, Err(AuthServiceError::ExpiredToken)),
        "expected ExpiredToken, got {result:?}"
    );
    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert!(!codes[0].is_validated());
}

#[tokio::test]
async fn should_not_verify_activation_code_as_reset_code() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = MockTokenRepo::new(
        vec![fresh_token(user.id, "424242", TokenPurpose::AccountActivation)],
        &users,
    );
    let uc = VerifyResetCodeUseCase { tokens };

    let result = uc.execute("424242").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

// ── ResetPasswordUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_reset_password_with_verified_code() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let user_rows = users.users_handle();
    let tokens = MockTokenRepo::new(
        vec![verified(fresh_token(
            user.id,
            "424242",
            TokenPurpose::ForgotPassword,
        ))],
        &users,
    );
    let codes = tokens.codes_handle();
    let uc = ResetPasswordUseCase {
        tokens,
        hasher: MockHasher,
    };

    uc.execute(reset_input("424242", "new-secret", "new-secret"))
        .await
        .unwrap();

    assert_eq!(user_rows.lock().unwrap()[0].password_hash, "hashed:new-secret");
    assert!(codes.lock().unwrap()[0].is_consumed());
}

#[tokio::test]
async fn should_check_confirmation_before_looking_up_the_code() {
    let users = MockUserRepo::new(vec![test_user()]);
    let tokens = MockTokenRepo::new(vec![], &users);
    let lookups = tokens.lookups_handle();
    let uc = ResetPasswordUseCase {
        tokens,
        hasher: MockHasher,
    };

    let result = uc
        .execute(reset_input("does-not-exist", "new-secret", "other-secret"))
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::PasswordMismatch)),
        "expected PasswordMismatch, got {result:?}"
    );
    assert!(lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_verification_before_reset() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let user_rows = users.users_handle();
    let tokens = MockTokenRepo::new(
        vec![fresh_token(user.id, "424242", TokenPurpose::ForgotPassword)],
        &users,
    );
    let uc = ResetPasswordUseCase {
        tokens,
        hasher: MockHasher,
    };

    let result = uc
        .execute(reset_input("424242", "new-secret", "new-secret"))
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::CodeNotVerified)),
        "expected CodeNotVerified, got {result:?}"
    );
    assert_eq!(
        user_rows.lock().unwrap()[0].password_hash,
        format!("hashed:{TEST_PASSWORD}")
    );
}

#[tokio::test]
async fn should_reject_expired_code_even_when_verified() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = MockTokenRepo::new(
        vec![verified(token_issued_ago(
            user.id,
            "424242",
            TokenPurpose::ForgotPassword,
            Duration::minutes(20),
        ))],
        &users,
    );
    let uc = ResetPasswordUseCase {
        tokens,
        hasher: MockHasher,
    };

    let result = uc
        .execute(reset_input("424242", "new-secret", "new-secret"))
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::ExpiredToken)),
        "expected ExpiredToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_replayed_reset_code() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = MockTokenRepo::new(
        vec![verified(fresh_token(
            user.id,
            "424242",
            TokenPurpose::ForgotPassword,
        ))],
        &users,
    );
    let codes = tokens.codes_handle();
    let uc = ResetPasswordUseCase {
        tokens,
        hasher: MockHasher,
    };

    uc.execute(reset_input("424242", "first", "first"))
        .await
        .unwrap();
    let replay = uc.execute(reset_input("424242", "second", "second")).await;

    assert!(
        matches!(replay, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {replay:?}"
    );

    let verify = VerifyResetCodeUseCase {
        tokens: MockTokenRepo {
            tokens: codes,
            users: users.users_handle(),
            lookups: Default::default(),
        },
    };
    let result = verify.execute("424242").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_use_latest_token_when_codes_collide() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let mut older = token_issued_ago(
        user.id,
        "424242",
        TokenPurpose::ForgotPassword,
        Duration::minutes(30),
    );
    older.validated_at = Some(Utc::now() - Duration::minutes(29));
    let newer = fresh_token(user.id, "424242", TokenPurpose::ForgotPassword);
    let tokens = MockTokenRepo::new(vec![older, newer], &users);
    let uc = ResetPasswordUseCase {
        tokens,
        hasher: MockHasher,
    };

    let result = uc
        .execute(reset_input("424242", "new-secret", "new-secret"))
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::CodeNotVerified)),
        "expected CodeNotVerified, got {result:?}"
    );
}

#[tokio::test]
async fn should_let_only_one_of_two_concurrent_resets_win() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let user_rows = users.users_handle();
    let tokens = MockTokenRepo::new(
        vec![verified(fresh_token(
            user.id,
            "424242",
            TokenPurpose::ForgotPassword,
        ))],
        &users,
    );
    let uc = ResetPasswordUseCase {
        tokens,
        hasher: MockHasher,
    };

    let (first, second) = tokio::join!(
        uc.execute(reset_input("424242", "first", "first")),
        uc.execute(reset_input("424242", "second", "second")),
    );

    let winner = match (&first, &second) {
        (Ok(()), Err(AuthServiceError::InvalidToken)) => "first",
        (Err(AuthServiceError::InvalidToken), Ok(())) => "second",
        _ => panic!("expected exactly one reset to succeed, got {first:?} and {second:?}"),
    };
    assert_eq!(
        user_rows.lock().unwrap()[0].password_hash,
        format!("hashed:{winner}")
    );
}

#[tokio::test]
async fn should_report_expiry_before_missing_verification() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = MockTokenRepo::new(
        vec![token_issued_ago(
            user.id,
            "424242",
            TokenPurpose::ForgotPassword,
            Duration::minutes(20),
        )],
        &users,
    );
    let uc = ResetPasswordUseCase {
        tokens,
        hasher: MockHasher,
    };

    let result = uc
        .execute(reset_input("424242", "new-secret", "new-secret"))
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::ExpiredToken)),
        "expected ExpiredToken, got {result:?}"
    );
}
