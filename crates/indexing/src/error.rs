//! Error types for indexing waits

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexingError {
    #[error("Response has no correlation id in field '{field}': {response}")]
    MissingCorrelationId { field: String, response: String },

    #[error("Not indexed after {attempts} attempts for {id}; last response: {last_response}")]
    NotIndexed {
        id: String,
        attempts: u32,
        last_response: String,
    },

    #[error("Invalid status endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Status endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Wrapped operation failed: {0}")]
    Operation(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type IndexingResult<T> = Result<T, IndexingError>;
