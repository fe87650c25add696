//! Public submission intake.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uidex_ingestion::SubmissionInput;

use crate::error::ApiError;
use crate::state::SharedState;

/// POST /api/submit
pub async fn submit(
    State(state): State<SharedState>,
    Json(input): Json<SubmissionInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = state.moderation.enqueue(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
