//! linear-sync: Keep an Obsidian document and Linear issues in step.
//!
//! `pull` brings assigned issues into the document as sections, `push`
//! sends section bodies back into issue descriptions, `sync` does
//! both.

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use linear_api::LinearClient;
use sync_cli::NativeStore;
use sync_cli::commands;

#[derive(Parser, Debug)]
#[command(name = "linear-sync")]
#[command(about = "Two-way sync between an Obsidian document and Linear issues")]
struct Args {
    /// Path to the vault directory
    #[arg(short, long)]
    vault: PathBuf,

    /// Document path inside the vault (e.g. Linear/Tasks.md)
    #[arg(short, long)]
    document: String,

    /// Linear API key (falls back to the LINEAR_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch assigned issues into the document
    Pull,
    /// Merge section bodies into issue descriptions
    Push,
    /// Pull, then push
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Respects RUST_LOG, defaults to info (or debug with --verbose).
    let default_filter = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api_key = args
        .api_key
        .or_else(|| std::env::var("LINEAR_API_KEY").ok())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| anyhow!("no Linear API key; pass --api-key or set LINEAR_API_KEY"))?;

    if args.document.trim().is_empty() {
        bail!("document path must not be empty");
    }

    let store = NativeStore::new(args.vault);
    let tracker = LinearClient::new(api_key);

    match args.command {
        Command::Pull => commands::pull(&store, &tracker, &args.document).await?,
        Command::Push => commands::push(&store, &tracker, &args.document).await?,
        Command::Sync => {
            commands::pull(&store, &tracker, &args.document).await?;
            commands::push(&store, &tracker, &args.document).await?;
        }
    }

    Ok(())
}
