mod commands;

use std::path::PathBuf;

use anyhow::Result;
use blockdoc_config::Config;
use clap::{Parser, Subcommand};

/// Edit and render structured block documents
#[derive(Parser, Debug)]
#[command(name = "blockdoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/blockdoc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Document store directory, overriding the config file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log engine activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered block types
    Types,

    /// Create an empty document
    New { id: String },

    /// Insert a block, optionally filling in its fields
    Insert {
        id: String,
        #[arg(value_name = "TYPE")]
        type_id: String,
        /// Position to insert at (defaults to the end)
        #[arg(long)]
        at: Option<usize>,
        /// JSON object of field values
        #[arg(long)]
        data: Option<String>,
    },

    /// Merge a JSON object of field values into a block
    Update {
        id: String,
        block: String,
        patch: String,
    },

    /// Remove a block
    Remove { id: String, block: String },

    /// Move a block to a new position
    Move {
        id: String,
        block: String,
        to: usize,
    },

    /// Check every block and report field errors
    Validate { id: String },

    /// Print display markup for a stored document or a wire file
    Render {
        #[arg(required_unless_present = "file")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        file: Option<PathBuf>,
    },

    /// Print a document's blocks
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());
    let mut config = Config::load_or_default(&config_path)?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    let ctx = commands::Context::new(&config);
    match cli.command {
        Command::Types => commands::types(&ctx),
        Command::New { id } => commands::new(&ctx, &id).await,
        Command::Insert {
            id,
            type_id,
            at,
            data,
        } => commands::insert(&ctx, &id, &type_id, at, data.as_deref()).await,
        Command::Update { id, block, patch } => {
            commands::update(&ctx, &id, &block, &patch).await
        }
        Command::Remove { id, block } => commands::remove(&ctx, &id, &block).await,
        Command::Move { id, block, to } => commands::move_block(&ctx, &id, &block, to).await,
        Command::Validate { id } => commands::validate(&ctx, &id).await,
        Command::Render { id, file } => commands::render(&ctx, id.as_deref(), file).await,
        Command::Show { id } => commands::show(&ctx, &id).await,
    }
}
