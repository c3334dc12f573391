use chrono::Duration;

use booknet_auth::domain::types::TokenPurpose;
use booknet_auth::usecase::purge::PurgeExpiredTokensUseCase;

use crate::helpers::{MockTokenRepo, MockUserRepo, fresh_token, test_user, token_issued_ago};

#[tokio::test]
async fn should_only_purge_tokens_past_retention() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let live = fresh_token(user.id, "111111", TokenPurpose::AccountActivation);
    let recently_expired = token_issued_ago(
        user.id,
        "222222",
        TokenPurpose::AccountActivation,
        Duration::minutes(30),
    );
    let stale = token_issued_ago(
        user.id,
        "333333",
        TokenPurpose::ForgotPassword,
        Duration::days(3),
    );
    let tokens = MockTokenRepo::new(vec![live, recently_expired, stale], &users);
    let codes = tokens.codes_handle();
    let uc = PurgeExpiredTokensUseCase {
        tokens,
        retention: Duration::days(1),
    };

    let removed = uc.execute().await.unwrap();

    assert_eq!(removed, 1);
    let mut remaining: Vec<String> = codes.lock().unwrap().iter().map(|t| t.code.clone()).collect();
    remaining.sort();
    assert_eq!(remaining, vec!["111111", "222222"]);
}

#[tokio::test]
async fn should_report_zero_when_nothing_is_stale() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = MockTokenRepo::new(
        vec![fresh_token(user.id, "111111", TokenPurpose::AccountActivation)],
        &users,
    );
    let uc = PurgeExpiredTokensUseCase {
        tokens,
        retention: Duration::zero(),
    };

    assert_eq!(uc.execute().await.unwrap(), 0);
}
