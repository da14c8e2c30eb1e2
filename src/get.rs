//! Recipe retrieval by id for the `recipes get` command.

use anyhow::Result;

use recipe_core::models::RecipeId;

use crate::config::Config;
use crate::server::open_service;

/// CLI entry point. Prints the recipe as JSON, exits 1 when it is absent.
pub async fn run_get(config: &Config, id: RecipeId) -> Result<()> {
    config.db.require_persistent("get")?;
    let service = open_service(config).await?;

    match service.find_by_id(id).await? {
        Some(recipe) => {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(())
        }
        None => {
            eprintln!("Error: Recipe not found with id: {}", id);
            std::process::exit(1);
        }
    }
}
