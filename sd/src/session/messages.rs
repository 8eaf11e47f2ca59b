//! Session controller messages
//!
//! Commands and responses for the actor pattern. Every user action maps
//! to one command carrying explicit parameters and a reply channel; the
//! two internal messages (`CompletionArrived`, `AutosaveFired`) are how
//! long-running work re-enters the single command queue.

use thiserror::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

use draftstore::{Document, DocumentKind, Project, PromptTemplates, Settings, StoreError};

use crate::llm::LlmError;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Channel error")]
    ChannelError,
}

/// Response from session operations
pub type SessionResponse<T> = Result<T, SessionError>;

/// What kind of generation the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationKind {
    /// Append new prose at the end of the active document
    ContinueFromEnd,
    /// Same request as ContinueFromEnd, but splice the result at a
    /// character offset instead of appending
    ContinueFromCursor { offset: usize },
    /// Rewrite the selected character range
    ImproveSelection { start: usize, end: usize },
    /// Ask for 5 numbered ideas, appended to the draft
    Brainstorm,
}

/// Per-call generation parameters
///
/// `None` fields fall back to the last-used values in settings, then to
/// the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    pub context_notes: String,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Exactly what one generation call would send
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPreview {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Result of a finished generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// The generated text
    pub text: String,
    /// False when the response arrived for a document that was deleted
    /// or closed in the meantime and was discarded
    pub applied: bool,
}

/// Partial settings update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub theme: Option<String>,
    pub font_size: Option<u16>,
    pub autosave_interval_ms: Option<u64>,
    pub last_model: Option<String>,
    pub last_temperature: Option<f32>,
    pub last_max_tokens: Option<u32>,
}

/// Commands sent to the session actor
#[derive(Debug)]
pub enum SessionCommand {
    // Project operations
    CreateProject {
        title: String,
        genre: String,
        description: String,
        target_word_count: Option<u32>,
        reply: oneshot::Sender<SessionResponse<String>>,
    },
    ListProjects {
        reply: oneshot::Sender<SessionResponse<Vec<Project>>>,
    },
    SelectProject {
        project_id: String,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    DeleteProject {
        project_id: String,
        reply: oneshot::Sender<SessionResponse<()>>,
    },

    // Document operations
    CreateDocument {
        title: String,
        kind: DocumentKind,
        reply: oneshot::Sender<SessionResponse<String>>,
    },
    ListDocuments {
        project_id: Option<String>,
        reply: oneshot::Sender<SessionResponse<Vec<Document>>>,
    },
    OpenDocument {
        doc_id: String,
        reply: oneshot::Sender<SessionResponse<Document>>,
    },
    EditContent {
        doc_id: String,
        content: String,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    RenameDocument {
        doc_id: String,
        title: String,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    SetDocumentKind {
        doc_id: String,
        kind: DocumentKind,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    Reorder {
        moved_id: String,
        target_id: String,
        insert_before: bool,
        reply: oneshot::Sender<SessionResponse<bool>>,
    },
    ToggleEnabled {
        doc_id: String,
        reply: oneshot::Sender<SessionResponse<bool>>,
    },
    DeleteDocument {
        doc_id: String,
        reply: oneshot::Sender<SessionResponse<()>>,
    },

    // Settings operations
    GetSettings {
        reply: oneshot::Sender<SessionResponse<Settings>>,
    },
    UpdateSettings {
        patch: SettingsPatch,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    SetPromptOverrides {
        overrides: Option<PromptTemplates>,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    ToggleFavoriteModel {
        model_id: String,
        reply: oneshot::Sender<SessionResponse<bool>>,
    },

    // Generation
    PreviewPrompt {
        kind: GenerationKind,
        params: GenerationParams,
        reply: oneshot::Sender<SessionResponse<PromptPreview>>,
    },
    Generate {
        kind: GenerationKind,
        params: GenerationParams,
        reply: oneshot::Sender<SessionResponse<GenerationOutcome>>,
    },

    // Persistence
    Save {
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    ExportBackup {
        reply: oneshot::Sender<SessionResponse<String>>,
    },
    ImportBackup {
        text: String,
        reply: oneshot::Sender<SessionResponse<()>>,
    },

    // Internal: a completion came back from the network task
    CompletionArrived {
        request_id: Uuid,
        result: Result<String, LlmError>,
    },

    // Internal: a debounced autosave timer fired
    AutosaveFired {
        epoch: u64,
    },

    // Shutdown
    Shutdown,
}
