//! # Deck CLI
//!
//! Command-line interface for the tiered card knowledge cache.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

mod commands;

use commands::card::SearchArgs;
use commands::Session;
use deck_core::{CacheTier, ConfigLoader};

/// CLI structure
#[derive(Parser, Debug)]
#[command(name = "deck")]
#[command(about = "Deck - tiered card knowledge cache")]
#[command(version)]
struct Cli {
    /// Output JSON format
    #[arg(long, global = true, help = "Output in JSON format")]
    json: bool,

    /// Configuration file (defaults to $DECK_CONFIG, ./deck.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Card database path, overrides the configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Main commands
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Import cards from a JSON array into the card database
    Import {
        /// JSON file containing card records
        file: PathBuf,
    },

    /// Look up cards by exact name (case-insensitive)
    Lookup {
        /// Card names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Search cards by criteria
    Search(SearchArgs),

    /// Approximate name search
    Fuzzy {
        /// Partial or misspelled card name
        name: String,
        /// Maximum number of results
        #[arg(long, short, default_value_t = 10)]
        limit: usize,
    },

    /// Warm the cache with the given card names
    Preload {
        /// Card names
        names: Vec<String>,
        /// File with one card name per line
        #[arg(long, short)]
        file: Option<PathBuf>,
    },

    /// Show cache statistics and tier health
    Stats,

    /// Clear the cache, or a single tier
    Clear {
        /// Tier to clear: 1/hot, 2/warm, 3/cold
        #[arg(long)]
        tier: Option<CacheTier>,
    },

    /// Run commands read from stdin, one per line, against a single cache
    Batch,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    info!("Running command: {:?}", cli.command);

    match run(cli).await {
        Ok(_) => {
            info!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let loader = match cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;
    if let Some(db) = cli.db {
        config.store.database_path = db;
    }

    let session = Session::open(config, cli.json)?;
    match cli.command {
        Commands::Batch => commands::batch::run(&session).await,
        command => commands::dispatch(&session, command).await,
    }
}
