pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/ats", post(handlers::handle_ats_upload))
        .route("/api/v1/ats/text", post(handlers::handle_ats_text))
        .route(
            "/api/v1/job-role/validate",
            post(handlers::handle_validate_role),
        )
        .layer(body_limit)
        .with_state(state)
}
