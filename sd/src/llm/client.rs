//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, LlmError, ModelInfo};

/// Stateless LLM client - each call is independent
///
/// This is the seam between the session controller and the remote
/// completion endpoint. One completion request carries everything the
/// provider needs; no conversation state is kept between calls, and no
/// call is retried - a failure is surfaced to the caller immediately.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and return the generated text
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;

    /// List the models the provider currently offers
    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError>;
}

/// Client stand-in used when no credential is configured
///
/// Lets the rest of the application run normally; every AI action
/// fails with the auth error until the user sets a key.
pub struct UnconfiguredClient {
    reason: String,
}

impl UnconfiguredClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl LlmClient for UnconfiguredClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::Auth(self.reason.clone()))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        Err(LlmError::Auth(self.reason.clone()))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted outcome for one mock completion call
    #[derive(Debug, Clone)]
    pub enum MockOutcome {
        /// Succeed with this text
        Text(String),
        /// Fail with this HTTP status (mapped through `from_status`)
        Status(u16),
    }

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        outcomes: Vec<MockOutcome>,
        call_count: AtomicUsize,
        delay_ms: u64,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl MockLlmClient {
        pub fn new(outcomes: Vec<MockOutcome>) -> Self {
            Self {
                outcomes,
                call_count: AtomicUsize::new(0),
                delay_ms: 0,
                last_request: Mutex::new(None),
            }
        }

        /// Shorthand for a client whose every call succeeds with `text`
        pub fn always(text: &str) -> Self {
            Self::new(vec![MockOutcome::Text(text.to_string())])
        }

        /// Delay each completion, to let tests interleave other commands
        pub fn with_delay(mut self, delay_ms: u64) -> Self {
            self.delay_ms = delay_ms;
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// The most recent request, for asserting on prompt content
        pub fn last_request(&self) -> Option<CompletionRequest> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);

            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }

            // The last scripted outcome repeats once the queue drains
            let outcome = self
                .outcomes
                .get(idx)
                .or_else(|| self.outcomes.last())
                .cloned()
                .ok_or_else(|| LlmError::InvalidResponse("no mock outcomes".to_string()))?;

            match outcome {
                MockOutcome::Text(text) => Ok(text),
                MockOutcome::Status(status) => Err(LlmError::from_status(status, "mock error".to_string())),
            }
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
            Ok(vec![ModelInfo {
                id: "mock/model".to_string(),
                name: "Mock Model".to_string(),
                context_window: 8192,
                prompt_price: 0.0,
                completion_price: 0.0,
                free: true,
            }])
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn request() -> CompletionRequest {
            CompletionRequest {
                model: "mock/model".to_string(),
                system_prompt: "sys".to_string(),
                user_prompt: "user".to_string(),
                temperature: 0.7,
                max_tokens: 100,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_outcomes_in_order() {
            let client = MockLlmClient::new(vec![
                MockOutcome::Text("one".to_string()),
                MockOutcome::Text("two".to_string()),
            ]);

            assert_eq!(client.complete(request()).await.unwrap(), "one");
            assert_eq!(client.complete(request()).await.unwrap(), "two");
            // Last outcome repeats once the queue is drained
            assert_eq!(client.complete(request()).await.unwrap(), "two");
            assert_eq!(client.call_count(), 3);
        }

        #[tokio::test]
        async fn test_mock_client_scripted_auth_failure() {
            let client = MockLlmClient::new(vec![MockOutcome::Status(401)]);
            let err = client.complete(request()).await.unwrap_err();
            assert!(err.is_auth());
        }
    }
}
