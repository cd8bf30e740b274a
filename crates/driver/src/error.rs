//! Error types for driver sessions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Unknown target: {0} (expected chrome, android or ios)")]
    UnknownTarget(String),

    #[error("Unknown execution mode: {0} (expected local, remote or cloud)")]
    UnknownMode(String),

    #[error("Not implemented: {0}")]
    Unimplemented(String),

    #[error("Missing device lab credentials: set {0}")]
    MissingCredentials(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("WebDriver error ({status}): {error} - {message}")]
    WebDriver {
        status: u16,
        error: String,
        message: String,
    },

    #[error("Unexpected WebDriver response: {0}")]
    Protocol(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DriverError {
    /// W3C error code, if the remote end reported one
    pub fn webdriver_code(&self) -> Option<&str> {
        match self {
            DriverError::WebDriver { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
