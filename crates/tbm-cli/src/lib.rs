//! # tbm-cli
//!
//! Terminal frontend for the reading-room catalog.
//!
//! ## Commands
//!
//! - `tbm count` - Catalog size for the landing page
//! - `tbm list [ROUTE]` - One list page, optionally searched and sorted
//! - `tbm show ID` - Detail page for one book
//! - `tbm browse [ROUTE]` - Interactive list session
//!
//! ## Configuration
//!
//! Settings come from `~/.config/tbm/config.toml` (or `--config`). The store
//! URL and key can be overridden with `TBM_SUPABASE_URL` and
//! `TBM_SUPABASE_ANON_KEY`.

pub mod commands;
pub mod render;
pub mod routes;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tbm_core::{CatalogConfig, ENV_ANON_KEY, ENV_STORE_URL};
use tbm_store::{MemoryStore, PostgrestStore, RecordStore};

/// TBM catalog - browse the reading-room book collection.
#[derive(Debug, Parser)]
#[command(name = "tbm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/tbm/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve books from a JSON file of table rows instead of the remote store.
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Store base URL.
    #[arg(long, env = ENV_STORE_URL, hide_env_values = true)]
    pub store_url: Option<String>,

    /// Store anon key.
    #[arg(long, env = ENV_ANON_KEY, hide_env_values = true)]
    pub anon_key: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the number of books in the catalog.
    Count,
    /// Print one list page.
    List(commands::list::ListArgs),
    /// Print the detail page for one book.
    Show(commands::show::ShowArgs),
    /// Browse a list page interactively.
    Browse(commands::browse::BrowseArgs),
}

/// Loaded configuration and the store every command reads from.
pub struct App {
    pub config: CatalogConfig,
    pub store: Arc<dyn RecordStore>,
}

impl App {
    /// Load configuration and pick a store for `cli`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or fixture cannot be read, or the
    /// remote store settings are invalid.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = CatalogConfig::load(cli.config.as_deref())?
            .with_overrides(cli.store_url.clone(), cli.anon_key.clone());
        let store = build_store(&config, cli.fixture.as_deref())?;
        Ok(Self { config, store })
    }
}

/// A fixture file wins over the remote store; with neither, the catalog is
/// empty.
pub fn build_store(
    config: &CatalogConfig,
    fixture: Option<&Path>,
) -> Result<Arc<dyn RecordStore>> {
    if let Some(path) = fixture {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        let store = MemoryStore::from_json(&text)
            .with_context(|| format!("Invalid fixture {}", path.display()))?;
        tracing::info!("Serving {} books from {}", store.len(), path.display());
        return Ok(Arc::new(store));
    }

    if config.store.is_configured() {
        let store = PostgrestStore::from_config(&config.store)
            .context("Failed to configure the remote store")?;
        tracing::info!("Using remote store at {}", store.endpoint());
        return Ok(Arc::new(store));
    }

    tracing::warn!(
        "No store configured (set {} and {}, or pass --fixture); the catalog is empty",
        ENV_STORE_URL,
        ENV_ANON_KEY
    );
    Ok(Arc::new(MemoryStore::default()))
}

/// Execute the parsed command.
///
/// # Errors
///
/// Returns an error if setup fails or a command cannot complete.
pub async fn run(cli: Cli) -> Result<()> {
    let app = App::from_cli(&cli)?;
    match cli.command {
        Commands::Count => commands::count::execute(&app).await,
        Commands::List(args) => commands::list::execute(args, &app).await,
        Commands::Show(args) => commands::show::execute(args, &app).await,
        Commands::Browse(args) => commands::browse::execute(args, &app).await,
    }
}
