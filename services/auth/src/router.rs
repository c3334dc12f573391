use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use booknet_core::health::{healthz, readyz};
use booknet_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{
        activate_account, authenticate, forgot_password, register, reset_password,
        verify_reset_code,
    },
    photo::upload_photo,
};
use crate::state::AppState;

/// Upper bound for a multipart photo body.
const PHOTO_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration and login
        .route("/auth/register", post(register))
        .route("/auth/authenticate", post(authenticate))
        .route("/auth/activate-account", post(activate_account))
        // Password reset
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/verify-reset-code", post(verify_reset_code))
        .route("/auth/reset-password", post(reset_password))
        // Photos
        .route(
            "/users/me/photo",
            post(upload_photo).layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        )
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
