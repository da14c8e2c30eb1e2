//! Recipe service: normalize, merge, and delegate to the store.
//!
//! Every operation is a single read-modify-write against a [`RecipeStore`].
//! Reads report a missing id as `Ok(None)`; mutations report it as
//! [`RecipeError::NotFound`].

use std::sync::Arc;

use crate::error::{RecipeError, Result};
use crate::filter::Filter;
use crate::models::{Recipe, RecipeId};
use crate::normalize::normalize_ingredients;
use crate::patch::MergePatch;
use crate::store::RecipeStore;

/// Orchestrates recipe operations over a shared store.
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Normalize ingredients and persist a new recipe.
    ///
    /// Any id on the input is discarded; the store assigns one.
    pub async fn create(&self, mut recipe: Recipe) -> Result<Recipe> {
        recipe.id = None;
        recipe.ingredients = normalize_ingredients(recipe.ingredients.take());
        let saved = self.store.save(recipe).await?;
        tracing::info!(id = ?saved.id, name = %saved.name, "created recipe");
        Ok(saved)
    }

    /// Replace every mutable field of an existing recipe.
    pub async fn update(&self, id: RecipeId, recipe: Recipe) -> Result<Recipe> {
        let mut existing = self.require(id).await?;
        existing.replace_fields(recipe);
        existing.ingredients = normalize_ingredients(existing.ingredients.take());
        let saved = self.store.save(existing).await?;
        tracing::info!(id, "updated recipe");
        Ok(saved)
    }

    /// Merge `patch` onto an existing recipe.
    pub async fn partial_update(&self, id: RecipeId, patch: MergePatch) -> Result<Recipe> {
        let mut existing = self.require(id).await?;
        tracing::debug!(id, fields = patch.updates().len(), "applying patch");
        patch.apply(&mut existing);
        let saved = self.store.save(existing).await?;
        tracing::info!(id, "patched recipe");
        Ok(saved)
    }

    pub async fn delete(&self, id: RecipeId) -> Result<()> {
        if !self.store.exists_by_id(id).await? {
            return Err(RecipeError::NotFound(id));
        }
        self.store.delete_by_id(id).await?;
        tracing::info!(id, "deleted recipe");
        Ok(())
    }

    pub async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// List recipes. [`Filter::All`] lists everything without touching the
    /// predicate path of the store.
    pub async fn find_all(&self, filter: &Filter) -> Result<Vec<Recipe>> {
        let recipes = match filter {
            Filter::All => self.store.find_all().await?,
            Filter::Matching(predicate) => {
                tracing::debug!(clauses = predicate.clauses().len(), "filtering recipes");
                self.store.find_matching(predicate).await?
            }
        };
        Ok(recipes)
    }

    async fn require(&self, id: RecipeId) -> Result<Recipe> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(RecipeError::NotFound(id))
    }
}
