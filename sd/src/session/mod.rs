//! Session controller
//!
//! Top-level orchestration: wires user actions to the store, the
//! context assembler, the prompt builder, the completion client and the
//! persistence gateway.

mod controller;
mod messages;

pub use controller::SessionController;
pub use messages::{
    GenerationKind, GenerationOutcome, GenerationParams, PromptPreview, SessionCommand,
    SessionError, SessionResponse, SettingsPatch,
};
