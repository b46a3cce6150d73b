//! HTTP router construction.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(state.request_timeout);

    Router::new()
        .route("/health", get(api::health))
        .route("/tasks/ping", post(api::create_ping_task))
        .route("/tasks/http", post(api::create_http_task))
        // Static segment wins over `{id}` in axum's matcher.
        .route("/tasks/stats", get(api::task_stats))
        .route("/tasks/{id}", get(api::get_task))
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
