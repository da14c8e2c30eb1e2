//! Recipe data model.
//!
//! [`Recipe`] is the only entity. It serializes with camelCase keys so the
//! JSON shape matches the HTTP API (`preparationTime`).

use serde::{Deserialize, Serialize};

/// Store-assigned recipe identity.
pub type RecipeId = i64;

/// A recipe record.
///
/// `id` is `None` until the recipe has been saved. `ingredients` is optional:
/// an absent list stays absent, a present one is always stored normalized
/// (see [`crate::normalize`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<RecipeId>,
    pub name: String,
    pub vegetarian: bool,
    pub servings: u32,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    pub instructions: String,
    pub preparation_time: u32,
}

impl Recipe {
    /// Overwrite every mutable field with the values from `other`.
    ///
    /// The identity of `self` is kept; `other.id` is ignored.
    pub fn replace_fields(&mut self, other: Recipe) {
        self.name = other.name;
        self.vegetarian = other.vegetarian;
        self.servings = other.servings;
        self.ingredients = other.ingredients;
        self.instructions = other.instructions;
        self.preparation_time = other.preparation_time;
    }

    /// Whether the ingredient list contains `ingredient` exactly.
    pub fn has_ingredient(&self, ingredient: &str) -> bool {
        self.ingredients
            .as_deref()
            .map(|list| list.iter().any(|i| i == ingredient))
            .unwrap_or(false)
    }
}
