//! Router configuration

use super::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Build the service router
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/verify", post(handlers::verify_claim))
        .route("/submit", post(handlers::submit_claim))
        .route("/api/health", get(handlers::health))
        .route("/api/sources", get(handlers::list_sources))
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}
