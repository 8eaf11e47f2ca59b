//! Scribe - local-first AI writing studio engine
//!
//! Scribe organizes writing work into projects of ordered documents,
//! persists everything locally as an encrypted snapshot, and augments
//! drafting with calls to a remote completion API.
//!
//! # Core Concepts
//!
//! - **One owner for state**: the session controller actor holds the
//!   document store; every user action is a command in its queue
//! - **Context from the project**: enabled documents, in order, become
//!   the reference material sent with each generation call
//! - **Stale responses are dropped**: generations are tagged with their
//!   target document and discarded if the editor has moved on
//! - **Corrupt state is absent state**: an unreadable snapshot starts
//!   an empty session, never a crash
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and the OpenRouter implementation
//! - [`context`] - AI context assembly from project documents
//! - [`prompts`] - prompt templates and placeholder substitution
//! - [`session`] - the session controller actor
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod context;
pub mod llm;
pub mod prompts;
pub mod session;

// Re-export commonly used types
pub use config::{AutosaveConfig, Config, LlmConfig, StorageConfig};
pub use context::{assemble, render, ContextEntry};
pub use llm::{create_client, CompletionRequest, LlmClient, LlmError, ModelInfo, OpenRouterClient};
pub use session::{
    GenerationKind, GenerationOutcome, GenerationParams, PromptPreview, SessionController,
    SessionError, SettingsPatch,
};
