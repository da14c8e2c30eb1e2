//! Recipe search: query-string parsing and the `recipes search` command.
//!
//! The HTTP boundary owns normalization of ingredient filters: every
//! `include`/`exclude` value is trimmed and lowercased before it reaches
//! [`RecipeFilter::build`]. Both repeated parameters and comma-separated
//! values are accepted, so `include=potato&include=salt` and
//! `include=potato,salt` are equivalent.

use anyhow::Result;

use recipe_core::filter::RecipeFilter;
use recipe_core::normalize::normalize_term;

use crate::config::Config;
use crate::server::open_service;

/// Parse a raw URL query string into a [`RecipeFilter`].
///
/// Unrecognized parameters are ignored. Returns a message naming the
/// parameter when a value cannot be parsed.
pub fn parse_query(raw: Option<&str>) -> Result<RecipeFilter, String> {
    let mut filter = RecipeFilter::default();
    let Some(raw) = raw else {
        return Ok(filter);
    };

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "vegetarian" => filter.vegetarian = Some(parse_bool("vegetarian", &value)?),
            "servings" => filter.servings = Some(parse_count("servings", &value)?),
            "preparationTime" => {
                filter.preparation_time = Some(parse_count("preparationTime", &value)?)
            }
            "include" => push_terms(&mut filter.include_ingredients, &value),
            "exclude" => push_terms(&mut filter.exclude_ingredients, &value),
            "text" => filter.text = Some(value.into_owned()),
            _ => {}
        }
    }
    Ok(filter)
}

/// Normalize ingredient terms for a filter list, splitting on commas.
pub fn normalize_terms<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(normalize_term)
        .filter(|t| !t.is_empty())
        .collect()
}

fn push_terms(target: &mut Option<Vec<String>>, value: &str) {
    target
        .get_or_insert_with(Vec::new)
        .extend(normalize_terms(&[value]));
}

fn parse_bool(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!("{} must be true or false, got '{}'", name, value)),
    }
}

fn parse_count(name: &str, value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("{} must be a non-negative integer, got '{}'", name, value))
}

/// CLI entry point for `recipes search`.
pub async fn run_search(config: &Config, filter: RecipeFilter) -> Result<()> {
    config.db.require_persistent("search")?;
    let service = open_service(config).await?;
    let recipes = service.find_all(&filter.build()).await?;

    if recipes.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&recipes)?);
    Ok(())
}
