//! In-memory [`RecipeStore`] implementation for testing and demos.
//!
//! Uses a `BTreeMap` behind `std::sync::RwLock`, so listing order is
//! ascending id like the SQLite store. Predicates are evaluated with
//! [`Predicate::matches`].

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::filter::Predicate;
use crate::models::{Recipe, RecipeId};

use super::RecipeStore;

struct Inner {
    recipes: BTreeMap<RecipeId, Recipe>,
    next_id: RecipeId,
}

/// In-memory store. Ids start at 1 and are never reused.
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                recipes: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.recipes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("in-memory store lock poisoned")
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.recipes.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: RecipeId) -> Result<bool> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.recipes.contains_key(&id))
    }

    async fn save(&self, mut recipe: Recipe) -> Result<Recipe> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let id = match recipe.id {
            Some(id) => {
                inner.next_id = inner.next_id.max(id + 1);
                id
            }
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                id
            }
        };
        recipe.id = Some(id);
        inner.recipes.insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn delete_by_id(&self, id: RecipeId) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.recipes.remove(&id);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Recipe>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.recipes.values().cloned().collect())
    }

    async fn find_matching(&self, predicate: &Predicate) -> Result<Vec<Recipe>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .recipes
            .values()
            .filter(|r| predicate.matches(r))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Filter, RecipeFilter};

    fn recipe(name: &str) -> Recipe {
        Recipe {
            id: None,
            name: name.to_string(),
            vegetarian: true,
            servings: 2,
            ingredients: Some(vec!["potato".to_string()]),
            instructions: "cook".to_string(),
            preparation_time: 15,
        }
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let store = InMemoryStore::new();
        let a = store.save(recipe("a")).await.unwrap();
        let b = store.save(recipe("b")).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_save_with_id_replaces() {
        let store = InMemoryStore::new();
        let mut saved = store.save(recipe("a")).await.unwrap();
        saved.name = "renamed".to_string();
        store.save(saved).await.unwrap();
        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "renamed");
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let a = store.save(recipe("a")).await.unwrap();
        store.delete_by_id(a.id.unwrap()).await.unwrap();
        assert!(store.is_empty());
        let b = store.save(recipe("b")).await.unwrap();
        assert_eq!(b.id, Some(2));
    }

    #[tokio::test]
    async fn test_find_matching() {
        let store = InMemoryStore::new();
        store.save(recipe("a")).await.unwrap();
        let mut other = recipe("b");
        other.vegetarian = false;
        store.save(other).await.unwrap();

        let Filter::Matching(predicate) = (RecipeFilter {
            vegetarian: Some(false),
            ..Default::default()
        })
        .build() else {
            panic!("expected a predicate");
        };
        let found = store.find_matching(&predicate).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "b");
    }
}
