//! LLM error types

use thiserror::Error;

/// Errors that can occur during LLM operations
///
/// No variant is retried: a failure aborts the single action that
/// triggered it and is surfaced to the user immediately.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Classify an HTTP error status
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => LlmError::Auth(message),
            _ => LlmError::Api { status, message },
        }
    }

    /// Check if this is a credential problem (blocks AI actions until
    /// the user fixes the key, rather than just failing one action)
    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::Auth(_))
    }
}
