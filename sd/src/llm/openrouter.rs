//! OpenRouter API client implementation
//!
//! Implements the LlmClient trait against OpenRouter's chat-completions
//! endpoint (OpenAI wire format) and its model catalog.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{CompletionRequest, LlmClient, LlmError, Message, ModelInfo};
use crate::config::LlmConfig;

/// OpenRouter API client
pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenRouterClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config;
    /// a missing key is an auth failure, reported before any request is
    /// attempted.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(base_url = %config.base_url, "from_config: called");
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            LlmError::Auth(format!("API key not found. Set the {} environment variable.", config.api_key_env))
        })?;
        if api_key.trim().is_empty() {
            return Err(LlmError::Auth(format!("{} is set but empty", config.api_key_env)));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the chat-completions endpoint
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(model = %request.model, max_tokens = %request.max_tokens, "build_request_body: called");
        let messages = vec![
            Message::system(request.system_prompt.clone()),
            Message::user(request.user_prompt.clone()),
        ];

        serde_json::json!({
            "model": request.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens.min(self.max_tokens),
        })
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        debug!(model = %request.model, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        // No retries: a failure aborts the action and is surfaced as-is
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "complete: API error");
            return Err(LlmError::from_status(status, text));
        }

        let api_response: ChatResponse = response.json().await?;
        parse_completion(api_response)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        debug!("list_models: called");
        let url = format!("{}/v1/models", self.base_url);

        let response = self.http.get(url).bearer_auth(&self.api_key).send().await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "list_models: API error");
            return Err(LlmError::from_status(status, text));
        }

        let catalog: ModelCatalog = response.json().await?;
        Ok(catalog.data.into_iter().map(parse_model).collect())
    }
}

/// Extract the generated text from a chat-completions response
fn parse_completion(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| LlmError::InvalidResponse("response contained no completion text".to_string()))
}

/// Convert a catalog entry to a ModelInfo
fn parse_model(entry: CatalogEntry) -> ModelInfo {
    let prompt_price = entry
        .pricing
        .as_ref()
        .and_then(|p| p.prompt.parse::<f64>().ok())
        .unwrap_or(0.0);
    let completion_price = entry
        .pricing
        .as_ref()
        .and_then(|p| p.completion.parse::<f64>().ok())
        .unwrap_or(0.0);
    let free = entry.id.ends_with(":free") || (prompt_price == 0.0 && completion_price == 0.0);

    ModelInfo {
        name: entry.name.unwrap_or_else(|| entry.id.clone()),
        id: entry.id,
        context_window: entry.context_length.unwrap_or(0),
        prompt_price,
        completion_price,
        free,
    }
}

// OpenRouter API response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ModelCatalog {
    data: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    name: Option<String>,
    context_length: Option<u32>,
    pricing: Option<CatalogPricing>,
}

#[derive(Debug, Deserialize)]
struct CatalogPricing {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    completion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> OpenRouterClient {
        OpenRouterClient {
            api_key: "test-key".to_string(),
            base_url: "https://openrouter.ai/api".to_string(),
            http: Client::new(),
            max_tokens: 2048,
        }
    }

    #[test]
    fn test_build_request_body() {
        let client = test_client();
        let request = CompletionRequest {
            model: "anthropic/claude-3.5-sonnet".to_string(),
            system_prompt: "You are a novelist.".to_string(),
            user_prompt: "Continue the story.".to_string(),
            temperature: 0.8,
            max_tokens: 500,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "anthropic/claude-3.5-sonnet");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a novelist.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Continue the story.");
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = test_client();
        let request = CompletionRequest {
            model: "m".to_string(),
            system_prompt: String::new(),
            user_prompt: String::new(),
            temperature: 0.7,
            max_tokens: 100_000, // above the configured ceiling
        };

        let body = client.build_request_body(&request);
        assert_eq!(body["max_tokens"], 2048);
    }

    #[test]
    fn test_parse_completion() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"The rain kept falling."}}]}"#,
        )
        .unwrap();
        assert_eq!(parse_completion(response).unwrap(), "The rain kept falling.");
    }

    #[test]
    fn test_parse_completion_empty_is_invalid() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(parse_completion(response), Err(LlmError::InvalidResponse(_))));

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":""}}]}"#).unwrap();
        assert!(parse_completion(response).is_err());
    }

    #[test]
    fn test_parse_model_catalog() {
        let catalog: ModelCatalog = serde_json::from_str(
            r#"{"data":[
                {"id":"anthropic/claude-3.5-sonnet","name":"Claude 3.5 Sonnet",
                 "context_length":200000,
                 "pricing":{"prompt":"0.000003","completion":"0.000015"}},
                {"id":"meta-llama/llama-3-8b:free","name":"Llama 3 8B (free)",
                 "context_length":8192,
                 "pricing":{"prompt":"0","completion":"0"}}
            ]}"#,
        )
        .unwrap();

        let models: Vec<ModelInfo> = catalog.data.into_iter().map(parse_model).collect();

        assert_eq!(models[0].id, "anthropic/claude-3.5-sonnet");
        assert_eq!(models[0].context_window, 200_000);
        assert!(!models[0].free);
        assert!((models[0].prompt_price - 3e-6).abs() < 1e-12);

        assert!(models[1].free);
        assert_eq!(models[1].completion_price, 0.0);
    }

    #[test]
    fn test_parse_model_missing_fields() {
        let entry: CatalogEntry = serde_json::from_str(r#"{"id":"mystery/model"}"#).unwrap();
        let model = parse_model(entry);
        assert_eq!(model.name, "mystery/model");
        assert_eq!(model.context_window, 0);
        assert!(model.free);
    }
}
