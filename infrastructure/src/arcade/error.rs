//! Error types for the Arcade adapter

use thiserror::Error;

/// Result type alias for Arcade operations
pub type Result<T> = std::result::Result<T, ArcadeError>;

/// Errors that can occur when talking to the Arcade API
#[derive(Error, Debug)]
pub enum ArcadeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Arcade API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Missing API key")]
    MissingApiKey,
}

impl ArcadeError {
    /// Connection-level failures, as opposed to the API answering with an error
    pub fn is_connection(&self) -> bool {
        matches!(self, ArcadeError::Http(e) if e.is_connect() || e.is_timeout())
    }
}
