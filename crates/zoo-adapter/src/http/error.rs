/*
[INPUT]:  Error sources (HTTP, API envelope, serialization, credentials)
[OUTPUT]: Structured error types with context and classification helpers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Server message returned when a quest reward was already collected.
pub const ALREADY_REWARDED: &str = "already rewarded";

/// Main error type for the game adapter
#[derive(Error, Debug)]
pub enum ZooError {
    /// HTTP request failed (connect, proxy, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-200 status or `success: false` in the response envelope
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Account auth string could not be parsed
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request exceeded its deadline
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// Local persistence (user-agent cache) failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ZooError {
    /// The step was already completed server-side; not a failure.
    pub fn is_already_rewarded(&self) -> bool {
        matches!(self, ZooError::Api { message, .. } if message.trim() == ALREADY_REWARDED)
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, ZooError::Api { code: 500, .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        ZooError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }

    /// Translate a transport error, surfacing timeouts as their own variant
    pub fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ZooError::Timeout {
                duration: timeout_secs,
            }
        } else {
            ZooError::Http(err)
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, ZooError>;
