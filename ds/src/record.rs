//! Domain records
//!
//! Project, Document and Settings are the three record types the store
//! owns. Identifiers are UUIDv7 strings (creation-time ordered), and
//! timestamps are Unix milliseconds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current Unix timestamp in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a record identifier
fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

fn default_true() -> bool {
    true
}

/// A top-level grouping of documents representing one writing work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Genre tag
    #[serde(default)]
    pub genre: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Target word count, if the user set one
    #[serde(default)]
    pub target_word_count: Option<u32>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Project {
    /// Create a new Project with generated ID
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: generate_id(),
            title: title.into(),
            genre: String::new(),
            description: String::new(),
            target_word_count: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the genre tag
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the target word count
    pub fn with_target(mut self, target: Option<u32>) -> Self {
        self.target_word_count = target;
        self
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = now_ms();
    }
}

/// Role of a document within its project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Chapter,
    Instructions,
    Synopsis,
    WritingStyle,
    Characters,
    Locations,
    Worldbuilding,
    Plot,
    Research,
    Notes,
    Other,
}

impl DocumentKind {
    /// All kinds, in menu order
    pub const ALL: [DocumentKind; 11] = [
        Self::Chapter,
        Self::Instructions,
        Self::Synopsis,
        Self::WritingStyle,
        Self::Characters,
        Self::Locations,
        Self::Worldbuilding,
        Self::Plot,
        Self::Research,
        Self::Notes,
        Self::Other,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Chapter => "Chapter",
            Self::Instructions => "Instructions",
            Self::Synopsis => "Synopsis",
            Self::WritingStyle => "Writing Style",
            Self::Characters => "Characters",
            Self::Locations => "Locations",
            Self::Worldbuilding => "Worldbuilding",
            Self::Plot => "Plot",
            Self::Research => "Research",
            Self::Notes => "Notes",
            Self::Other => "Other",
        }
    }

    /// Parse from a user-supplied name (CLI input)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|k| format!("{}", k) == normalized)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chapter => write!(f, "chapter"),
            Self::Instructions => write!(f, "instructions"),
            Self::Synopsis => write!(f, "synopsis"),
            Self::WritingStyle => write!(f, "writing_style"),
            Self::Characters => write!(f, "characters"),
            Self::Locations => write!(f, "locations"),
            Self::Worldbuilding => write!(f, "worldbuilding"),
            Self::Plot => write!(f, "plot"),
            Self::Research => write!(f, "research"),
            Self::Notes => write!(f, "notes"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A titled unit of content within a project
///
/// `content` is the authoritative rich-text blob (HTML). `word_count` is
/// a cache recomputed on every content update, never a source of truth.
/// `order` positions the document within its project; `None` marks
/// legacy records that predate explicit ordering and is repaired on
/// listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: String,

    /// Owning project identifier
    pub project_id: String,

    /// Human-readable title
    pub title: String,

    /// Role within the project
    #[serde(default)]
    pub kind: DocumentKind,

    /// Rich content blob (HTML)
    #[serde(default)]
    pub content: String,

    /// Cached plain-text word count
    #[serde(default)]
    pub word_count: u32,

    /// Whether this document participates in AI context assembly
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Position within the project (dense 0-based after normalization)
    #[serde(default)]
    pub order: Option<u32>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Document {
    /// Create a new Document with generated ID
    pub fn new(project_id: impl Into<String>, title: impl Into<String>, kind: DocumentKind) -> Self {
        let now = now_ms();
        Self {
            id: generate_id(),
            project_id: project_id.into(),
            title: title.into(),
            kind,
            content: String::new(),
            word_count: 0,
            enabled: true,
            order: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the position within the project
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = now_ms();
    }

    /// Update the kind
    pub fn set_kind(&mut self, kind: DocumentKind) {
        self.kind = kind;
        self.updated_at = now_ms();
    }
}

/// A system/user prompt template pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplates {
    pub system: String,
    pub user: String,
}

/// User preferences, persisted with the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// UI theme name
    pub theme: String,

    /// Editor font size in points
    pub font_size: u16,

    /// Autosave debounce interval in milliseconds
    pub autosave_interval_ms: u64,

    /// Last opened project, restored on startup
    pub last_project_id: Option<String>,

    /// Last opened document, restored on startup
    pub last_document_id: Option<String>,

    /// Favorited model identifiers (order irrelevant)
    pub favorite_models: BTreeSet<String>,

    /// Custom prompt templates overriding the built-in defaults
    pub prompt_overrides: Option<PromptTemplates>,

    /// Last used model identifier
    pub last_model: Option<String>,

    /// Last used sampling temperature
    pub last_temperature: f32,

    /// Last used output token budget
    pub last_max_tokens: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            font_size: 16,
            autosave_interval_ms: 2_000,
            last_project_id: None,
            last_document_id: None,
            favorite_models: BTreeSet::new(),
            prompt_overrides: None,
            last_model: None,
            last_temperature: 0.7,
            last_max_tokens: 500,
        }
    }
}

impl Settings {
    /// Install custom prompt templates
    ///
    /// An override is accepted only if both templates are non-empty
    /// after trimming; passing `None` restores the built-in defaults.
    pub fn set_prompt_overrides(
        &mut self,
        overrides: Option<PromptTemplates>,
    ) -> Result<(), crate::StoreError> {
        match overrides {
            Some(t) if t.system.trim().is_empty() || t.user.trim().is_empty() => {
                Err(crate::StoreError::Validation(
                    "prompt override requires both a system and a user template".to_string(),
                ))
            }
            other => {
                self.prompt_overrides = other;
                Ok(())
            }
        }
    }

    /// Toggle a model in the favorites set, returning the new membership
    pub fn toggle_favorite(&mut self, model_id: &str) -> bool {
        if self.favorite_models.remove(model_id) {
            false
        } else {
            self.favorite_models.insert(model_id.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_new() {
        let project = Project::new("Novel").with_genre("fantasy").with_target(Some(80_000));
        assert!(!project.id.is_empty());
        assert_eq!(project.title, "Novel");
        assert_eq!(project.genre, "fantasy");
        assert_eq!(project.target_word_count, Some(80_000));
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_document_new_defaults() {
        let doc = Document::new("project-1", "Chapter 1", DocumentKind::Chapter);
        assert_eq!(doc.project_id, "project-1");
        assert!(doc.enabled);
        assert_eq!(doc.word_count, 0);
        assert_eq!(doc.order, None);
    }

    #[test]
    fn test_document_kind_parse() {
        assert_eq!(DocumentKind::parse("chapter"), Some(DocumentKind::Chapter));
        assert_eq!(DocumentKind::parse("Writing Style"), Some(DocumentKind::WritingStyle));
        assert_eq!(DocumentKind::parse("writing-style"), Some(DocumentKind::WritingStyle));
        assert_eq!(DocumentKind::parse("bogus"), None);
    }

    #[test]
    fn test_document_kind_serde_snake_case() {
        let json = serde_json::to_string(&DocumentKind::WritingStyle).unwrap();
        assert_eq!(json, "\"writing_style\"");
        let kind: DocumentKind = serde_json::from_str("\"worldbuilding\"").unwrap();
        assert_eq!(kind, DocumentKind::Worldbuilding);
    }

    #[test]
    fn test_document_missing_order_deserializes_none() {
        // Legacy records carry no order field at all
        let json = r#"{
            "id": "d1", "project_id": "p1", "title": "Old",
            "created_at": 1, "updated_at": 1
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.order, None);
        assert!(doc.enabled);
        assert_eq!(doc.kind, DocumentKind::Chapter);
    }

    #[test]
    fn test_settings_prompt_override_rejects_blank() {
        let mut settings = Settings::default();

        let result = settings.set_prompt_overrides(Some(PromptTemplates {
            system: "  ".to_string(),
            user: "Continue: {RECENT_TEXT}".to_string(),
        }));
        assert!(result.is_err());
        assert!(settings.prompt_overrides.is_none());

        settings
            .set_prompt_overrides(Some(PromptTemplates {
                system: "You are a novelist.".to_string(),
                user: "Continue: {RECENT_TEXT}".to_string(),
            }))
            .unwrap();
        assert!(settings.prompt_overrides.is_some());

        settings.set_prompt_overrides(None).unwrap();
        assert!(settings.prompt_overrides.is_none());
    }

    #[test]
    fn test_settings_toggle_favorite() {
        let mut settings = Settings::default();
        assert!(settings.toggle_favorite("openai/gpt-4o"));
        assert!(settings.favorite_models.contains("openai/gpt-4o"));
        assert!(!settings.toggle_favorite("openai/gpt-4o"));
        assert!(settings.favorite_models.is_empty());
    }
}
