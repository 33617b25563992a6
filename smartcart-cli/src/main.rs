use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod sync;

use commands::{
    AddCommand, CacheCommand, ConfigCommand, ListCommand, PriceCommand, RemoveCommand,
    RenameCommand, StatsCommand, SyncCommand, ToggleCommand,
};
use config::Config;
use sync::{try_auto_pull, try_auto_push};

#[derive(Parser)]
#[command(name = "cart")]
#[command(version)]
#[command(about = "A shopping list CLI with sheet sync", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item to the list
    Add(AddCommand),

    /// Toggle an item's purchased state
    Toggle(ToggleCommand),

    /// Rename an item
    Rename(RenameCommand),

    /// Change an item's unit price
    Price(PriceCommand),

    /// Remove an item from the list
    Remove(RemoveCommand),

    /// Show the list, unpurchased items first
    List(ListCommand),

    /// Show list totals and completion
    Stats(StatsCommand),

    /// Sync with the remote sheet
    Sync(SyncCommand),

    /// Manage the offline asset cache
    Cache(CacheCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartcart_core=warn,cart=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    // Auto-sync BEFORE read commands
    if is_read_command(&cli.command) {
        try_auto_pull(&config).await;
    }

    let result = execute_command(&cli.command, &config).await;

    // Auto-sync AFTER write commands (only if command succeeded)
    if result.is_ok() && is_write_command(&cli.command) {
        try_auto_push(&config).await;
    }

    result
}

async fn execute_command(
    command: &Option<Commands>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Some(Commands::Add(cmd)) => cmd.run(config),
        Some(Commands::Toggle(cmd)) => cmd.run(config),
        Some(Commands::Rename(cmd)) => cmd.run(config),
        Some(Commands::Price(cmd)) => cmd.run(config),
        Some(Commands::Remove(cmd)) => cmd.run(config),
        Some(Commands::List(cmd)) => cmd.run(config),
        Some(Commands::Stats(cmd)) => cmd.run(config),
        Some(Commands::Sync(cmd)) => cmd.run(config).await,
        Some(Commands::Cache(cmd)) => cmd.run(config).await,
        Some(Commands::Config(cmd)) => cmd.run(config),
        None => {
            println!("Use --help to see available commands");
            Ok(())
        }
    }
}

/// Returns true if the command reads the list and should pull first.
fn is_read_command(cmd: &Option<Commands>) -> bool {
    matches!(cmd, Some(Commands::List(_)) | Some(Commands::Stats(_)))
}

/// Returns true if the command changes the list and should push afterwards.
fn is_write_command(cmd: &Option<Commands>) -> bool {
    matches!(
        cmd,
        Some(Commands::Add(_))
            | Some(Commands::Toggle(_))
            | Some(Commands::Rename(_))
            | Some(Commands::Price(_))
            | Some(Commands::Remove(_))
    )
}
