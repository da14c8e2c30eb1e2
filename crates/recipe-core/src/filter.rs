//! Search filter composition.
//!
//! A [`RecipeFilter`] carries the optional search inputs. [`RecipeFilter::build`]
//! turns each present input into one or more [`Criterion`]s and joins them
//! into a single AND-[`Predicate`]. When nothing is present the result is
//! [`Filter::All`], which callers must treat as "list everything" rather
//! than asking the store to match a predicate.
//!
//! # Clause order
//!
//! Clauses are emitted in a fixed order so that the same inputs always
//! produce the same predicate:
//!
//! | Order | Input | Criterion |
//! |-------|-------|-----------|
//! | 1 | `vegetarian` | [`Criterion::VegetarianIs`] |
//! | 2 | `servings` | [`Criterion::ServingsIs`] |
//! | 3 | `include_ingredients` | [`Criterion::HasIngredient`] per entry |
//! | 4 | `exclude_ingredients` | [`Criterion::LacksIngredient`] per entry |
//! | 5 | `text` | [`Criterion::InstructionsContain`] |
//! | 6 | `preparation_time` | [`Criterion::PreparationTimeIs`] |
//!
//! Ingredient values are compared verbatim against the stored (normalized)
//! ingredients. Normalizing caller input is the job of the boundary that
//! builds the filter.

use serde::{Deserialize, Serialize};

use crate::models::Recipe;

/// Optional search inputs. Every field is independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFilter {
    pub vegetarian: Option<bool>,
    pub servings: Option<u32>,
    pub include_ingredients: Option<Vec<String>>,
    pub exclude_ingredients: Option<Vec<String>>,
    pub text: Option<String>,
    pub preparation_time: Option<u32>,
}

/// One elementary condition over a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    VegetarianIs(bool),
    ServingsIs(u32),
    /// The ingredient list contains this value.
    HasIngredient(String),
    /// The ingredient list does not contain this value.
    LacksIngredient(String),
    /// Lowercased needle, matched case-insensitively against `instructions`.
    InstructionsContain(String),
    PreparationTimeIs(u32),
}

impl Criterion {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Criterion::VegetarianIs(v) => recipe.vegetarian == *v,
            Criterion::ServingsIs(n) => recipe.servings == *n,
            Criterion::HasIngredient(i) => recipe.has_ingredient(i),
            Criterion::LacksIngredient(i) => !recipe.has_ingredient(i),
            Criterion::InstructionsContain(needle) => {
                recipe.instructions.to_lowercase().contains(needle.as_str())
            }
            Criterion::PreparationTimeIs(m) => recipe.preparation_time == *m,
        }
    }
}

/// Conjunction of one or more criteria.
///
/// Only [`RecipeFilter::build`] creates predicates, so a `Predicate` is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Criterion>,
}

impl Predicate {
    pub fn clauses(&self) -> &[Criterion] {
        &self.clauses
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.clauses.iter().all(|c| c.matches(recipe))
    }
}

/// Outcome of building a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// No criterion was supplied: every recipe is returned.
    All,
    /// Only recipes satisfying the predicate are returned.
    Matching(Predicate),
}

impl Filter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Filter::All => true,
            Filter::Matching(p) => p.matches(recipe),
        }
    }
}

impl RecipeFilter {
    /// Compose the present inputs into a [`Filter`].
    pub fn build(&self) -> Filter {
        let mut clauses = Vec::new();

        if let Some(v) = self.vegetarian {
            clauses.push(Criterion::VegetarianIs(v));
        }
        if let Some(n) = self.servings {
            clauses.push(Criterion::ServingsIs(n));
        }
        if let Some(list) = &self.include_ingredients {
            clauses.extend(list.iter().cloned().map(Criterion::HasIngredient));
        }
        if let Some(list) = &self.exclude_ingredients {
            clauses.extend(list.iter().cloned().map(Criterion::LacksIngredient));
        }
        if let Some(text) = &self.text {
            let needle = text.trim().to_lowercase();
            if !needle.is_empty() {
                clauses.push(Criterion::InstructionsContain(needle));
            }
        }
        if let Some(m) = self.preparation_time {
            clauses.push(Criterion::PreparationTimeIs(m));
        }

        if clauses.is_empty() {
            Filter::All
        } else {
            Filter::Matching(Predicate { clauses })
        }
    }
}
