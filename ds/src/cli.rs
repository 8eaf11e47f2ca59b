//! CLI argument parsing for draftstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ds")]
#[command(author, version, about = "Inspect and port the scribe draft store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored projects with their document counts
    List,

    /// Show store statistics
    Stats,

    /// Export the store as plaintext JSON backup
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a plaintext JSON backup, replacing the stored state
    Import {
        /// Backup file to read
        #[arg(required = true)]
        input: PathBuf,
    },
}
