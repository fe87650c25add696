use thiserror::Error;
use uidex_common::UidexError;
use uidex_db::DbError;

/// Failure of one extraction rule (or of the publish step of a run).
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("source unavailable: {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },

    #[error("malformed document at {url}: {reason}")]
    MalformedDocument { url: String, reason: String },

    #[error("invalid rule for {library}: {reason}")]
    InvalidRule { library: String, reason: String },

    #[error("publish failed: {0}")]
    Publish(#[from] DbError),
}

impl HarvestError {
    pub fn unavailable(url: &str, err: UidexError) -> Self {
        HarvestError::SourceUnavailable { url: url.to_string(), reason: err.to_string() }
    }

    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        HarvestError::MalformedDocument { url: url.to_string(), reason: reason.into() }
    }

    pub fn invalid_rule(library: &str, reason: impl Into<String>) -> Self {
        HarvestError::InvalidRule { library: library.to_string(), reason: reason.into() }
    }
}

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("submission {0} not found")]
    NotFound(uuid::Uuid),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("store error: {0}")]
    Store(#[from] DbError),
}
