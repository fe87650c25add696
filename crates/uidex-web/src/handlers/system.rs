//! Health endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use uidex_db::DatabaseStats;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(flatten)]
    pub stats: DatabaseStats,
}

/// GET /api/health
pub async fn health(State(state): State<SharedState>) -> Result<Json<HealthResponse>, ApiError> {
    let stats = state.db.stats().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        stats,
    }))
}
