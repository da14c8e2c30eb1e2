//! Storage abstraction for Recipe Manager.
//!
//! The [`RecipeStore`] trait is the only way the service reaches persistence,
//! enabling pluggable backends (SQLite, in-memory).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::filter::Predicate;
use crate::models::{Recipe, RecipeId};

/// Abstract storage backend for recipes.
///
/// Each method is one unit of work. The store owns identity assignment and
/// durability; it never normalizes or validates recipe contents.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_by_id`](RecipeStore::find_by_id) | Fetch one recipe |
/// | [`exists_by_id`](RecipeStore::exists_by_id) | Check an id without loading the row |
/// | [`save`](RecipeStore::save) | Insert (no id) or replace (with id) |
/// | [`delete_by_id`](RecipeStore::delete_by_id) | Remove one recipe |
/// | [`find_all`](RecipeStore::find_all) | List every recipe |
/// | [`find_matching`](RecipeStore::find_matching) | List recipes satisfying a predicate |
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>>;

    async fn exists_by_id(&self, id: RecipeId) -> Result<bool>;

    /// Persist a recipe.
    ///
    /// When `recipe.id` is `None` a new id is assigned; otherwise the stored
    /// row with that id is replaced. Returns the recipe as stored.
    async fn save(&self, recipe: Recipe) -> Result<Recipe>;

    async fn delete_by_id(&self, id: RecipeId) -> Result<()>;

    /// Every recipe, ordered by ascending id.
    async fn find_all(&self) -> Result<Vec<Recipe>>;

    /// Recipes satisfying `predicate`, ordered by ascending id.
    async fn find_matching(&self, predicate: &Predicate) -> Result<Vec<Recipe>>;
}
