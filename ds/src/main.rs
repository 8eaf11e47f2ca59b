use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use draftstore::cli::{Cli, Command};
use draftstore::config::Config;
use draftstore::{cipher, DocumentStore, PersistenceGateway, SqliteKv};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn open_gateway(config: &Config) -> Result<PersistenceGateway> {
    let key = cipher::load_or_create_key(&config.key_path()).context("Failed to load store key")?;
    let kv = SqliteKv::open(config.db_path()).context("Failed to open store")?;
    Ok(PersistenceGateway::new(Box::new(kv), key))
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("draftstore starting");

    match cli.command {
        Command::List => {
            let gateway = open_gateway(&config)?;
            let mut store = match gateway.load() {
                Some(snapshot) => DocumentStore::restore(snapshot),
                None => {
                    println!("Store is empty");
                    return Ok(());
                }
            };

            let projects: Vec<_> = store.list_projects().to_vec();
            for project in projects {
                let docs = store.list_documents(&project.id);
                println!(
                    "{} {} ({} documents, {} words)",
                    project.id.dimmed(),
                    project.title.cyan(),
                    docs.len(),
                    store.project_word_count(&project.id)
                );
            }
        }
        Command::Stats => {
            let gateway = open_gateway(&config)?;
            match gateway.load() {
                Some(snapshot) => {
                    println!("Snapshot version: {}", snapshot.version);
                    println!("Projects:  {}", snapshot.projects.len());
                    println!("Documents: {}", snapshot.documents.len());
                    println!(
                        "Words:     {}",
                        snapshot.documents.iter().map(|d| d.word_count as u64).sum::<u64>()
                    );
                }
                None => println!("Store is empty"),
            }
        }
        Command::Export { output } => {
            let gateway = open_gateway(&config)?;
            let snapshot = gateway
                .load()
                .ok_or_else(|| eyre::eyre!("Store is empty, nothing to export"))?;
            let text = gateway.export_backup(&snapshot)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text).context("Failed to write backup")?;
                    println!("{} Exported backup to {}", "✓".green(), path.display());
                }
                None => println!("{}", text),
            }
        }
        Command::Import { input } => {
            let text = std::fs::read_to_string(&input).context("Failed to read backup")?;
            let mut gateway = open_gateway(&config)?;
            let snapshot = gateway.import_backup(&text).context("Backup is not valid")?;
            gateway.save(&snapshot)?;
            println!(
                "{} Imported {} projects, {} documents",
                "✓".green(),
                snapshot.projects.len(),
                snapshot.documents.len()
            );
        }
    }

    Ok(())
}
