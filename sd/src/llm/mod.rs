//! LLM client module for Scribe
//!
//! Provides the completion client and the provider model catalog.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openrouter;
mod types;

pub use client::{LlmClient, UnconfiguredClient};
pub use error::LlmError;
pub use openrouter::OpenRouterClient;
pub use types::{CompletionRequest, Message, ModelInfo, Role};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, "create_client: called");
    match config.provider.as_str() {
        "openrouter" => Ok(Arc::new(OpenRouterClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: openrouter",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        assert!(create_client(&config).is_err());
    }

    #[test]
    #[serial]
    fn test_create_client_missing_key_is_auth_error() {
        let config = LlmConfig {
            api_key_env: "SCRIBE_TEST_MISSING_KEY".to_string(),
            ..Default::default()
        };
        // SAFETY: serialized test, no concurrent env access
        unsafe { std::env::remove_var("SCRIBE_TEST_MISSING_KEY") };
        match create_client(&config) {
            Err(e) => assert!(e.is_auth()),
            Ok(_) => panic!("expected auth error"),
        }
    }

    #[test]
    #[serial]
    fn test_create_client_with_key() {
        let config = LlmConfig {
            api_key_env: "SCRIBE_TEST_PRESENT_KEY".to_string(),
            ..Default::default()
        };
        // SAFETY: serialized test, no concurrent env access
        unsafe { std::env::set_var("SCRIBE_TEST_PRESENT_KEY", "sk-test") };
        assert!(create_client(&config).is_ok());
        unsafe { std::env::remove_var("SCRIBE_TEST_PRESENT_KEY") };
    }
}
