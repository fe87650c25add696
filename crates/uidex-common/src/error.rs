use thiserror::Error;

#[derive(Debug, Error)]
pub enum UidexError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Security policy violation: {0}")]
    SecurityError(String),
}

pub type Result<T> = std::result::Result<T, UidexError>;
