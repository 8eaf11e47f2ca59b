//! Prompt building
//!
//! Merges templates, the assembled document context and the trailing
//! draft window into the system/user message pair for one generation
//! call. Substitution is literal: each placeholder token is replaced
//! with its content, or with the empty string when there is none.

use draftstore::Settings;

use super::embedded;

/// Trailing draft window for continuation calls, in characters
pub const RECENT_WINDOW_CONTINUE: usize = 4_000;

/// Trailing draft window for brainstorm calls, in characters
pub const RECENT_WINDOW_BRAINSTORM: usize = 2_000;

/// Resolved system/user template pair for one generation call
#[derive(Debug, Clone)]
pub struct Templates {
    pub system: String,
    pub user: String,
}

/// Pick the continuation templates: user overrides when installed,
/// embedded defaults otherwise
///
/// Override validity (both halves non-empty) is enforced where the
/// settings are mutated, not here.
pub fn resolve_templates(settings: &Settings) -> Templates {
    match &settings.prompt_overrides {
        Some(overrides) => Templates {
            system: overrides.system.clone(),
            user: overrides.user.clone(),
        },
        None => Templates {
            system: embedded::CONTINUE_SYSTEM.to_string(),
            user: embedded::CONTINUE_USER.to_string(),
        },
    }
}

/// Fill the system template
pub fn build_system_prompt(
    template: &str,
    token_budget: u32,
    context_notes: &str,
    documents_context: &str,
) -> String {
    template
        .replace("{TOKENS_TO_GENERATE}", &token_budget.to_string())
        .replace("{CONTEXT_NOTES}", context_notes)
        .replace("{DOCUMENTS_CONTEXT}", documents_context)
}

/// Fill the user template
pub fn build_user_prompt(template: &str, recent_text: &str) -> String {
    template.replace("{RECENT_TEXT}", recent_text)
}

/// The trailing `limit` characters of a draft
///
/// The window bounds request size; the full document is never sent.
/// Splits on a char boundary, not a byte boundary.
pub fn recent_window(text: &str, limit: usize) -> &str {
    let char_count = text.chars().count();
    if char_count <= limit {
        return text;
    }
    let skip = char_count - limit;
    let (start, _) = text.char_indices().nth(skip).unwrap_or((0, ' '));
    &text[start..]
}
