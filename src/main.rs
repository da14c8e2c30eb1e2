//! # Recipe Manager CLI (`recipes`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recipes init` | Create the SQLite database and run schema migrations |
//! | `recipes serve` | Start the HTTP server |
//! | `recipes get <id>` | Print one recipe as JSON |
//! | `recipes search [filters]` | Print matching recipes as JSON |
//!
//! ## Examples
//!
//! ```bash
//! recipes --config ./config/recipes.toml init
//! recipes --config ./config/recipes.toml serve
//! recipes search --vegetarian true --include potato --exclude meat --text oven
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use recipe_core::filter::RecipeFilter;
use recipe_manager::search::normalize_terms;
use recipe_manager::{config, get, logging, migrate, search, server};

/// Recipe Manager: a recipe store with composable search filters and
/// merge-style partial updates.
#[derive(Parser)]
#[command(name = "recipes", version)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/recipes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent; running it multiple times is safe.
    Init,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Print a recipe by id.
    Get {
        id: i64,
    },

    /// Search recipes. With no filters every recipe is listed.
    Search {
        #[arg(long)]
        vegetarian: Option<bool>,

        #[arg(long)]
        servings: Option<u32>,

        /// Required ingredient. Repeat or comma-separate for several.
        #[arg(long)]
        include: Vec<String>,

        /// Excluded ingredient. Repeat or comma-separate for several.
        #[arg(long)]
        exclude: Vec<String>,

        /// Case-insensitive substring of the instructions.
        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        preparation_time: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Get { id } => {
            get::run_get(&cfg, id).await?;
        }
        Commands::Search {
            vegetarian,
            servings,
            include,
            exclude,
            text,
            preparation_time,
        } => {
            let filter = RecipeFilter {
                vegetarian,
                servings,
                include_ingredients: Some(normalize_terms(&include)),
                exclude_ingredients: Some(normalize_terms(&exclude)),
                text,
                preparation_time,
            };
            search::run_search(&cfg, filter).await?;
        }
    }

    Ok(())
}
