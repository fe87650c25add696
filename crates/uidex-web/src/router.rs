//! Axum router: maps all URL paths to handlers.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    admin::{approve, list_pending, reject, require_admin, run_harvest},
    search::search,
    submit::submit,
    system::health,
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    let admin = Router::new()
        .route("/submissions",              get(list_pending))
        .route("/submissions/{id}/approve", post(approve))
        .route("/submissions/{id}/reject",  post(reject))
        .route("/harvest",                  post(run_harvest))
        .route_layer(middleware::from_fn_with_state(shared.clone(), require_admin));

    Router::new()
        .route("/api/search", get(search))
        .route("/api/submit", post(submit))
        .route("/api/health", get(health))
        .nest("/api/admin", admin)

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
