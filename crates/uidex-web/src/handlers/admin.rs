//! Moderation and harvest endpoints, behind the optional admin token.

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uidex_db::{CatalogEntry, Submission};
use uidex_ingestion::HarvestReport;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::SharedState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Rejects admin requests without the configured token. No token configured
/// means the gate is open.
pub async fn require_admin(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.admin_token.as_deref() {
        let presented = request
            .headers()
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected) {
            return Err(ApiError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}

/// GET /api/admin/submissions
pub async fn list_pending(State(state): State<SharedState>) -> Result<Json<Vec<Submission>>, ApiError> {
    Ok(Json(state.moderation.list_pending().await?))
}

/// POST /api/admin/submissions/{id}/approve
pub async fn approve(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CatalogEntry>, ApiError> {
    Ok(Json(state.moderation.approve(id).await?))
}

/// POST /api/admin/submissions/{id}/reject
pub async fn reject(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.moderation.reject(id).await?;
    Ok(Json(json!({ "id": id, "status": "rejected" })))
}

/// POST /api/admin/harvest: run every configured rule and publish.
pub async fn run_harvest(State(state): State<SharedState>) -> Result<Json<HarvestReport>, ApiError> {
    info!(rules = state.rules.len(), "Harvest requested over HTTP");
    Ok(Json(state.harvester.run(&state.rules).await?))
}
