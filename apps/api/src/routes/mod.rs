pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_upload;
use crate::presentation::handlers::{handle_dashboard, handle_get_resume, handle_list_resumes};
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            post(handle_upload).get(handle_list_resumes),
        )
        .route("/api/v1/resumes/:id", get(handle_get_resume))
        .route("/api/v1/dashboard", get(handle_dashboard))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
