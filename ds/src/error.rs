//! Store error types

use thiserror::Error;

/// Errors from store, persistence and cipher operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Cipher error: {0}")]
    Cipher(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl StoreError {
    /// Check whether this error should block the action without
    /// mutating any state (user input problem, not a system failure)
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_) | StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_validation() {
        assert!(StoreError::Validation("empty title".to_string()).is_validation());
        assert!(StoreError::NotFound("doc-1".to_string()).is_validation());
        assert!(!StoreError::Storage("disk full".to_string()).is_validation());
    }
}
