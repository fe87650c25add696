//! Catalog search endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uidex_db::CatalogEntry;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<CatalogEntry>,
    pub total: usize,
}

/// GET /api/search?q=: ranked substring search over the catalog.
pub async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state.engine.search(params.q.as_deref()).await?;
    Ok(Json(SearchResponse {
        query: params.q.unwrap_or_default(),
        total: results.len(),
        results,
    }))
}
