//! draftsync CLI - Command-line interface for draftsync
//!
//! Provides commands for:
//! - Composing and editing drafts locally
//! - Saving, updating, deleting and duplicating drafts against the server
//! - Reconciling the local list with the server
//! - Exporting drafts and showing statistics

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::{
    compose::{EditCommand, NewCommand},
    config::ConfigCommand,
    delete::DeleteCommand,
    duplicate::DuplicateCommand,
    export::ExportCommand,
    list::ListCommand,
    save::SaveCommand,
    stats::StatsCommand,
    sync::SyncCommand,
    update::UpdateCommand,
};
use context::{load_config, AppContext};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "draftsync", version, about = "Local-first draft synchronization")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List drafts known to this device
    List(ListCommand),
    /// Create a new local draft
    New(NewCommand),
    /// Edit a draft locally (autosave, never sent to the server)
    Edit(EditCommand),
    /// Save a draft, creating or overwriting the server copy when signed in
    Save(SaveCommand),
    /// Update fields of a draft on the server and locally
    Update(UpdateCommand),
    /// Delete a draft
    Delete(DeleteCommand),
    /// Copy a draft under a new identity
    Duplicate(DuplicateCommand),
    /// Write the visible draft list to a dated JSON file
    Export(ExportCommand),
    /// Show word and template statistics
    Stats(StatsCommand),
    /// Reconcile local drafts with the server
    Sync(SyncCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn init_tracing(verbose: u8, configured_level: &str) {
    let level = match verbose {
        0 => configured_level,
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, format: OutputFormat) -> Result<()> {
    let (config, config_path) = load_config(cli.config.clone())?;
    init_tracing(cli.verbose, &config.logging.level);

    if let Commands::Config(cmd) = &cli.command {
        return cmd.execute(&config, &config_path, format);
    }

    let ctx = AppContext::new(config, config_path)?;

    match cli.command {
        Commands::List(cmd) => cmd.execute(&ctx, format),
        Commands::New(cmd) => cmd.execute(&ctx, format),
        Commands::Edit(cmd) => cmd.execute(&ctx, format),
        Commands::Save(cmd) => cmd.execute(&ctx, format).await,
        Commands::Update(cmd) => cmd.execute(&ctx, format).await,
        Commands::Delete(cmd) => cmd.execute(&ctx, format).await,
        Commands::Duplicate(cmd) => cmd.execute(&ctx, format).await,
        Commands::Export(cmd) => cmd.execute(&ctx, format),
        Commands::Stats(cmd) => cmd.execute(&ctx, format),
        Commands::Sync(cmd) => cmd.execute(&ctx, format).await,
        Commands::Config(_) => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    if let Err(e) = run(cli, format).await {
        get_formatter(matches!(format, OutputFormat::Json)).error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
