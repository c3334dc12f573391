use std::path::PathBuf;

use sea_orm::Database;
use tracing::info;

use booknet_auth::config::AuthConfig;
use booknet_auth::infra::mail::AppMailer;
use booknet_auth::infra::password::Argon2Hasher;
use booknet_auth::reaper::spawn_token_reaper;
use booknet_auth::router::build_router;
use booknet_auth::state::AppState;
use booknet_auth_types::identity::JwtSecret;
use booknet_core::config::Config;
use booknet_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();
    let purge_every = config
        .token_purge_interval()
        .expect("invalid TOKEN_PURGE_INTERVAL_SECS");
    let retention = config
        .token_retention()
        .expect("invalid TOKEN_RETENTION_SECS");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = AppMailer::from_config(&config).expect("invalid mail configuration");

    let state = AppState {
        db,
        mailer,
        hasher: Argon2Hasher::default(),
        jwt_secret: JwtSecret::new(config.jwt_secret),
        jwt_expiration_secs: config.jwt_expiration_secs,
        activation_url: config.activation_url,
        reset_url: config.reset_url,
        photos_root: PathBuf::from(&config.photos_output_path),
    };

    spawn_token_reaper(state.token_repo(), purge_every, retention);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
