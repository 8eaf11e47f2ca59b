//! LLM request/response types
//!
//! These model the OpenRouter chat-completions API (OpenAI wire format)
//! but are provider-agnostic enough to support other providers.

use serde::{Deserialize, Serialize};

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,

    /// System prompt (rendered from a template)
    pub system_prompt: String,

    /// User prompt
    pub user_prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Max tokens for the response
    pub max_tokens: u32,
}

/// A message in the chat-completions wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// An available model as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier, e.g. "anthropic/claude-3.5-sonnet"
    pub id: String,

    /// Display name
    pub name: String,

    /// Context window in tokens
    pub context_window: u32,

    /// USD per prompt token
    pub prompt_price: f64,

    /// USD per completion token
    pub completion_price: f64,

    /// Whether the model is free to use
    pub free: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::system("You are a novelist.");
        assert_eq!(msg.role, Role::System);
        let msg = Message::user("Continue the story.");
        assert_eq!(msg.role, Role::User);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
