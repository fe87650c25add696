//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uidex_ingestion::{HarvestError, ModerationError};
use uidex_ranker::SearchError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("admin token missing or invalid")]
    Unauthorized,

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_)  => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_)    => StatusCode::NOT_FOUND,
            ApiError::Unauthorized   => StatusCode::UNAUTHORIZED,
            ApiError::Internal(msg)  => {
                error!("Request failed: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::Validation(_) => ApiError::BadRequest(err.to_string()),
            ModerationError::NotFound(_)   => ApiError::NotFound(err.to_string()),
            ModerationError::Publish(_) | ModerationError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<HarvestError> for ApiError {
    fn from(err: HarvestError) -> Self {
        match err {
            HarvestError::InvalidRule { .. } => ApiError::BadRequest(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<uidex_db::DbError> for ApiError {
    fn from(err: uidex_db::DbError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
