//! Scribe - local-first AI writing studio
//!
//! CLI entry point.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use draftstore::{cipher, DocumentKind, PersistenceGateway, PromptTemplates, SqliteKv};
use scribed::cli::{
    BackupCommand, Cli, Command, DocCommand, GenerationKnobs, ProjectCommand, SettingsCommand,
    WriteCommand,
};
use scribed::config::Config;
use scribed::llm::create_client;
use scribed::session::{GenerationKind, GenerationParams, SessionController, SettingsPatch};

fn setup_logging(config: &Config, verbose: bool) -> Result<()> {
    let log_dir = config.storage.data_dir.join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, not stdout: stdout belongs to command output
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("scribed.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn open_gateway(config: &Config) -> Result<PersistenceGateway> {
    let key = cipher::load_or_create_key(&config.storage.key_path()).context("Failed to load store key")?;
    let kv = SqliteKv::open(config.storage.db_path()).context("Failed to open store")?;
    Ok(PersistenceGateway::new(Box::new(kv), key))
}

/// Spawn a session over the persisted state
///
/// A missing API key blocks AI actions only: the session still opens
/// and every non-AI command works, with generation failing until the
/// credential is set.
fn open_session(config: &Config) -> Result<SessionController> {
    let gateway = open_gateway(config)?;
    let llm: Arc<dyn scribed::LlmClient> = match create_client(&config.llm) {
        Ok(client) => client,
        Err(e) if e.is_auth() => {
            tracing::warn!(error = %e, "No API key configured, AI actions disabled");
            Arc::new(scribed::llm::UnconfiguredClient::new(e.to_string()))
        }
        Err(e) => return Err(e).context("Failed to create LLM client"),
    };
    Ok(SessionController::spawn(gateway, llm, config.clone()))
}

fn parse_kind(s: &str) -> Result<DocumentKind> {
    DocumentKind::parse(s).ok_or_else(|| {
        eyre::eyre!(
            "Unknown document kind '{}'. One of: {}",
            s,
            DocumentKind::ALL.map(|k| k.to_string()).join(", ")
        )
    })
}

fn generation_params(knobs: &GenerationKnobs) -> GenerationParams {
    GenerationParams {
        context_notes: knobs.notes.clone(),
        model: knobs.model.clone(),
        temperature: knobs.temperature,
        max_tokens: knobs.max_tokens,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(&config, cli.verbose).context("Failed to setup logging")?;

    match cli.command {
        Command::Project { command } => cmd_project(&config, command).await,
        Command::Doc { command } => cmd_doc(&config, command).await,
        Command::Write { command } => cmd_write(&config, command).await,
        Command::Preview { knobs } => cmd_preview(&config, &knobs).await,
        Command::Models { favorites } => cmd_models(&config, favorites).await,
        Command::Favorite { model_id } => cmd_favorite(&config, &model_id).await,
        Command::Backup { command } => cmd_backup(&config, command).await,
        Command::Settings { command } => cmd_settings(&config, command).await,
    }
}

async fn cmd_project(config: &Config, command: ProjectCommand) -> Result<()> {
    let session = open_session(config)?;

    match command {
        ProjectCommand::New {
            title,
            genre,
            description,
            target,
        } => {
            let id = session.create_project(&title, &genre, &description, target).await?;
            session.select_project(&id).await?;
            println!("{} Created project: {}", "✓".green(), id.cyan());
        }
        ProjectCommand::List => {
            let projects = session.list_projects().await?;
            if projects.is_empty() {
                println!("No projects yet. Create one with: sd project new <title>");
            }
            let current = session.get_settings().await?.last_project_id;
            for project in projects {
                let marker = if Some(project.id.as_str()) == current.as_deref() {
                    "*".yellow().to_string()
                } else {
                    " ".to_string()
                };
                let target = project
                    .target_word_count
                    .map(|t| format!(" (target {})", t))
                    .unwrap_or_default();
                println!("{} {} {}{}", marker, project.id.dimmed(), project.title.cyan(), target.dimmed());
            }
        }
        ProjectCommand::Select { project_id } => {
            session.select_project(&project_id).await?;
            println!("{} Selected project: {}", "✓".green(), project_id);
        }
        ProjectCommand::Delete { project_id } => {
            session.delete_project(&project_id).await?;
            println!("{} Deleted project and its documents: {}", "✓".green(), project_id);
        }
    }

    session.shutdown().await;
    Ok(())
}

async fn cmd_doc(config: &Config, command: DocCommand) -> Result<()> {
    let session = open_session(config)?;

    match command {
        DocCommand::New { title, kind } => {
            let kind = parse_kind(&kind)?;
            let id = session.create_document(&title, kind).await?;
            println!("{} Created document: {}", "✓".green(), id.cyan());
        }
        DocCommand::List { project } => {
            let docs = session.list_documents(project.as_deref()).await?;
            if docs.is_empty() {
                println!("No documents in this project");
            }
            for doc in docs {
                let enabled = if doc.enabled { "●".green() } else { "○".dimmed() };
                println!(
                    "{:>3} {} {} {} [{}] {} words",
                    doc.order.map(|o| o.to_string()).unwrap_or_default(),
                    enabled,
                    doc.id.dimmed(),
                    doc.title.cyan(),
                    doc.kind.label(),
                    doc.word_count
                );
            }
        }
        DocCommand::Open { doc_id } => {
            let doc = session.open_document(&doc_id).await?;
            println!("{} Opened: {} ({} words)", "✓".green(), doc.title.cyan(), doc.word_count);
        }
        DocCommand::SetContent { doc_id, text, file } => {
            let content = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(&path).context("Failed to read content file")?,
                (None, None) => return Err(eyre::eyre!("Provide --text or --file")),
            };
            session.edit_content(&doc_id, &content).await?;
            // The autosave debounce would also catch this, but a one-shot
            // CLI process exits too soon to rely on it
            session.save().await?;
            println!("{} Updated content", "✓".green());
        }
        DocCommand::Rename { doc_id, title } => {
            session.rename_document(&doc_id, &title).await?;
            println!("{} Renamed document", "✓".green());
        }
        DocCommand::Kind { doc_id, kind } => {
            let kind = parse_kind(&kind)?;
            session.set_document_kind(&doc_id, kind).await?;
            println!("{} Changed kind to {}", "✓".green(), kind.label());
        }
        DocCommand::Reorder {
            moved_id,
            target_id,
            after,
        } => {
            let moved = session.reorder(&moved_id, &target_id, !after).await?;
            if moved {
                println!("{} Reordered", "✓".green());
            } else {
                println!("{} Nothing to do (unknown ids or different projects)", "·".dimmed());
            }
        }
        DocCommand::Toggle { doc_id } => {
            let enabled = session.toggle_enabled(&doc_id).await?;
            let state = if enabled { "included in" } else { "excluded from" };
            println!("{} Document now {} AI context", "✓".green(), state);
        }
        DocCommand::Delete { doc_id } => {
            session.delete_document(&doc_id).await?;
            println!("{} Deleted document: {}", "✓".green(), doc_id);
        }
    }

    session.shutdown().await;
    Ok(())
}

async fn cmd_write(config: &Config, command: WriteCommand) -> Result<()> {
    let session = open_session(config)?;

    let (kind, knobs) = match command {
        WriteCommand::Continue { knobs, at } => match at {
            Some(offset) => (GenerationKind::ContinueFromCursor { offset }, knobs),
            None => (GenerationKind::ContinueFromEnd, knobs),
        },
        WriteCommand::Improve { start, end, knobs } => (GenerationKind::ImproveSelection { start, end }, knobs),
        WriteCommand::Brainstorm { knobs } => (GenerationKind::Brainstorm, knobs),
    };

    println!("Generating...");
    let outcome = session.generate(kind, generation_params(&knobs)).await?;

    if outcome.applied {
        println!("{}", outcome.text);
        println!();
        println!("{} Applied to the open document", "✓".green());
    } else {
        println!("{} Response discarded: the editor moved on", "⚠".yellow());
    }

    session.shutdown().await;
    Ok(())
}

async fn cmd_preview(config: &Config, knobs: &GenerationKnobs) -> Result<()> {
    let session = open_session(config)?;

    let preview = session
        .preview_prompt(GenerationKind::ContinueFromEnd, generation_params(knobs))
        .await?;

    println!("{}", "Model".bold());
    println!(
        "  {} (temperature {}, max tokens {})",
        preview.model, preview.temperature, preview.max_tokens
    );
    println!();
    println!("{}", "System prompt".bold());
    println!("{}", preview.system);
    println!();
    println!("{}", "User prompt".bold());
    println!("{}", preview.user);

    session.shutdown().await;
    Ok(())
}

async fn cmd_models(config: &Config, favorites_only: bool) -> Result<()> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let models = llm.list_models().await?;

    let session = open_session(config)?;
    let favorites = session.get_settings().await?.favorite_models;
    session.shutdown().await;

    let mut shown = 0;
    for model in &models {
        if favorites_only && !favorites.contains(&model.id) {
            continue;
        }
        shown += 1;
        let star = if favorites.contains(&model.id) { "★".yellow() } else { " ".normal() };
        let price = if model.free {
            "free".green().to_string()
        } else {
            format!("${:.2}/M in, ${:.2}/M out", model.prompt_price * 1e6, model.completion_price * 1e6)
        };
        println!(
            "{} {} {} ({} ctx, {})",
            star,
            model.id.cyan(),
            model.name,
            model.context_window,
            price
        );
    }
    println!();
    println!("{} models", shown);

    Ok(())
}

async fn cmd_favorite(config: &Config, model_id: &str) -> Result<()> {
    let session = open_session(config)?;
    let favorited = session.toggle_favorite_model(model_id).await?;
    if favorited {
        println!("{} Favorited {}", "★".yellow(), model_id.cyan());
    } else {
        println!("{} Unfavorited {}", "✓".green(), model_id.cyan());
    }
    session.shutdown().await;
    Ok(())
}

async fn cmd_backup(config: &Config, command: BackupCommand) -> Result<()> {
    let session = open_session(config)?;

    match command {
        BackupCommand::Export { output } => {
            let text = session.export_backup().await?;
            match output {
                Some(path) => {
                    fs::write(&path, text).context("Failed to write backup")?;
                    println!("{} Exported backup to {}", "✓".green(), path.display());
                }
                None => println!("{}", text),
            }
        }
        BackupCommand::Import { input } => {
            let text = fs::read_to_string(&input).context("Failed to read backup")?;
            session.import_backup(&text).await?;
            println!("{} Imported backup from {}", "✓".green(), input.display());
        }
    }

    session.shutdown().await;
    Ok(())
}

async fn cmd_settings(config: &Config, command: SettingsCommand) -> Result<()> {
    let session = open_session(config)?;

    match command {
        SettingsCommand::Show => {
            let settings = session.get_settings().await?;
            println!("theme:            {}", settings.theme);
            println!("font size:        {}", settings.font_size);
            println!("autosave (ms):    {}", settings.autosave_interval_ms);
            println!(
                "model:            {}",
                settings.last_model.as_deref().unwrap_or(&config.llm.model)
            );
            println!("temperature:      {}", settings.last_temperature);
            println!("max tokens:       {}", settings.last_max_tokens);
            println!(
                "prompt overrides: {}",
                if settings.prompt_overrides.is_some() { "custom" } else { "built-in" }
            );
            if !settings.favorite_models.is_empty() {
                println!("favorites:");
                for model in &settings.favorite_models {
                    println!("  ★ {}", model);
                }
            }
        }
        SettingsCommand::Set {
            theme,
            font_size,
            autosave_ms,
            model,
            temperature,
            max_tokens,
        } => {
            session
                .update_settings(SettingsPatch {
                    theme,
                    font_size,
                    autosave_interval_ms: autosave_ms,
                    last_model: model,
                    last_temperature: temperature,
                    last_max_tokens: max_tokens,
                })
                .await?;
            println!("{} Settings updated", "✓".green());
        }
        SettingsCommand::SetPrompts {
            system_file,
            user_file,
            reset,
        } => {
            if reset {
                session.set_prompt_overrides(None).await?;
                println!("{} Restored built-in prompt templates", "✓".green());
            } else {
                // clap enforces presence of both files unless --reset
                let system = fs::read_to_string(system_file.unwrap_or_default())
                    .context("Failed to read system template")?;
                let user =
                    fs::read_to_string(user_file.unwrap_or_default()).context("Failed to read user template")?;
                session
                    .set_prompt_overrides(Some(PromptTemplates { system, user }))
                    .await?;
                println!("{} Installed custom prompt templates", "✓".green());
            }
        }
    }

    session.shutdown().await;
    Ok(())
}
