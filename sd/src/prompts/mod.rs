//! Prompt templates and building

pub mod builder;
pub mod embedded;

pub use builder::{
    build_system_prompt, build_user_prompt, recent_window, resolve_templates, Templates,
    RECENT_WINDOW_BRAINSTORM, RECENT_WINDOW_CONTINUE,
};
