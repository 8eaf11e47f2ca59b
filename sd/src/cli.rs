//! CLI argument parsing for scribed
//!
//! Each subcommand maps onto one session command; the editor shell in
//! front of the engine drives the same surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sd")]
#[command(author, version, about = "Local-first AI writing studio", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Manage documents in the current project
    Doc {
        #[command(subcommand)]
        command: DocCommand,
    },

    /// Run an AI generation against the open document
    Write {
        #[command(subcommand)]
        command: WriteCommand,
    },

    /// Show exactly what a continuation call would send
    Preview {
        #[command(flatten)]
        knobs: GenerationKnobs,
    },

    /// List available models from the provider
    Models {
        /// Only show favorited models
        #[arg(short, long)]
        favorites: bool,
    },

    /// Toggle a model in the favorites set
    Favorite {
        /// Model identifier
        #[arg(required = true)]
        model_id: String,
    },

    /// Export or import plaintext backups
    Backup {
        #[command(subcommand)]
        command: BackupCommand,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a project
    New {
        /// Project title
        #[arg(required = true)]
        title: String,

        /// Genre tag
        #[arg(short, long, default_value = "")]
        genre: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Target word count
        #[arg(short, long)]
        target: Option<u32>,
    },

    /// List all projects
    List,

    /// Make a project current
    Select {
        #[arg(required = true)]
        project_id: String,
    },

    /// Delete a project and all of its documents
    Delete {
        #[arg(required = true)]
        project_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocCommand {
    /// Create a document in the current project
    New {
        /// Document title
        #[arg(required = true)]
        title: String,

        /// Document kind (chapter, synopsis, characters, ...)
        #[arg(short, long, default_value = "chapter")]
        kind: String,
    },

    /// List the current project's documents in order
    List {
        /// List another project instead
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Open a document in the editor
    Open {
        #[arg(required = true)]
        doc_id: String,
    },

    /// Replace a document's content
    SetContent {
        #[arg(required = true)]
        doc_id: String,

        /// Literal content
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Read content from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Rename a document
    Rename {
        #[arg(required = true)]
        doc_id: String,

        #[arg(required = true)]
        title: String,
    },

    /// Change a document's kind
    Kind {
        #[arg(required = true)]
        doc_id: String,

        #[arg(required = true)]
        kind: String,
    },

    /// Move a document relative to another
    ///
    /// The drop position (before or after the target) is decided by the
    /// caller; in the editor shell that is the pointer's side of the
    /// target card's midpoint.
    Reorder {
        /// Document to move
        #[arg(required = true)]
        moved_id: String,

        /// Document to move it next to
        #[arg(required = true)]
        target_id: String,

        /// Insert after the target instead of before it
        #[arg(long)]
        after: bool,
    },

    /// Flip whether a document participates in AI context
    Toggle {
        #[arg(required = true)]
        doc_id: String,
    },

    /// Delete a document
    Delete {
        #[arg(required = true)]
        doc_id: String,
    },
}

/// Generation knobs shared by the write subcommands
#[derive(Parser, Debug, Clone)]
pub struct GenerationKnobs {
    /// Free-text notes folded into the system prompt for this call
    #[arg(short, long, default_value = "")]
    pub notes: String,

    /// Model to use (defaults to the last used model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Output token budget
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum WriteCommand {
    /// Continue the draft from its end (or from a cursor offset)
    Continue {
        #[command(flatten)]
        knobs: GenerationKnobs,

        /// Splice the result at this character offset instead of appending
        #[arg(long)]
        at: Option<usize>,
    },

    /// Rewrite a selected character range
    Improve {
        /// Selection start (character offset)
        #[arg(long, required = true)]
        start: usize,

        /// Selection end (character offset, exclusive)
        #[arg(long, required = true)]
        end: usize,

        #[command(flatten)]
        knobs: GenerationKnobs,
    },

    /// Ask for 5 numbered ideas, appended to the draft
    Brainstorm {
        #[command(flatten)]
        knobs: GenerationKnobs,
    },
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Write the full state as plaintext JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the full state from a plaintext JSON backup
    Import {
        #[arg(required = true)]
        input: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Change settings fields
    Set {
        #[arg(long)]
        theme: Option<String>,

        #[arg(long)]
        font_size: Option<u16>,

        /// Autosave debounce in milliseconds
        #[arg(long)]
        autosave_ms: Option<u64>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        temperature: Option<f32>,

        #[arg(long)]
        max_tokens: Option<u32>,
    },

    /// Install custom prompt templates (both halves required)
    SetPrompts {
        /// File holding the system template
        #[arg(long, required_unless_present = "reset")]
        system_file: Option<PathBuf>,

        /// File holding the user template
        #[arg(long, required_unless_present = "reset")]
        user_file: Option<PathBuf>,

        /// Remove the overrides and return to the built-in defaults
        #[arg(long)]
        reset: bool,
    },
}
