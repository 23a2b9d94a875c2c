//! Client error types.

use teer_core::ValidationError;

/// Errors that can occur when using the Teer client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid configuration: missing API key, malformed base URL, empty API version.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Payload failed validation. Nothing was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Server returned a non-2xx response.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Request exceeded its timeout.
    #[error("request timed out")]
    Timeout,

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of a [`ClientError::Status`] error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().as_ref().map(reqwest::StatusCode::as_u16),
            _ => None,
        }
    }

    /// Response body of a [`ClientError::Status`] error, parsed as JSON.
    #[must_use]
    pub fn body_json(&self) -> Option<serde_json::Value> {
        match self {
            Self::Status { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}
