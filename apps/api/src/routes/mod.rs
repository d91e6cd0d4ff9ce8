pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::optimization::handlers as optimization;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/providers",
            get(optimization::handle_list_providers),
        )
        .route(
            "/api/v1/providers/:name/test",
            post(optimization::handle_test_provider),
        )
        // Job analysis
        .route("/api/v1/jobs/analyze", post(optimization::handle_analyze_job))
        // Résumé API
        .route("/api/v1/resumes/extract", post(extraction::handle_extract))
        .route("/api/v1/resumes/optimize", post(optimization::handle_optimize))
        .route(
            "/api/v1/resumes/optimize/text",
            post(optimization::handle_optimize_text),
        )
        .route("/api/v1/resumes/render", post(render::handle_render))
        .route("/api/v1/resumes/demo", get(optimization::handle_demo))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
