//! Merge-style partial updates.
//!
//! A PATCH body is a JSON object naming only the fields to change. Each key
//! is parsed into a typed [`FieldUpdate`]; the resulting [`MergePatch`] is then
//! applied onto an existing [`Recipe`].
//!
//! Key policy:
//!
//! - `id` is dropped. Identity never changes through a patch.
//! - Any other key that is not a recipe field is rejected with
//!   [`PatchError::UnknownField`], so client typos surface as errors instead
//!   of silent no-ops.
//! - Values are type-checked strictly; `"2"` is not a valid `servings`.
//! - `ingredients` accepts an array of strings or `null` (clears the list).

use serde_json::{Map, Value};

use crate::error::PatchError;
use crate::models::Recipe;
use crate::normalize;

/// A single recognized field replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Vegetarian(bool),
    Servings(u32),
    Ingredients(Option<Vec<String>>),
    Instructions(String),
    PreparationTime(u32),
}

/// An ordered set of field updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePatch {
    updates: Vec<FieldUpdate>,
}

impl MergePatch {
    pub fn updates(&self) -> &[FieldUpdate] {
        &self.updates
    }

    /// Parse a JSON value, which must be an object.
    pub fn from_json(value: &Value) -> Result<Self, PatchError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(PatchError::NotAnObject),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self, PatchError> {
        let mut updates = Vec::with_capacity(map.len());
        for (key, value) in map {
            let update = match key.as_str() {
                "id" => continue,
                "name" => FieldUpdate::Name(expect_string("name", value)?),
                "vegetarian" => FieldUpdate::Vegetarian(
                    value.as_bool().ok_or(PatchError::InvalidValue {
                        field: "vegetarian",
                        expected: "a boolean",
                    })?,
                ),
                "servings" => FieldUpdate::Servings(expect_count("servings", value)?),
                "ingredients" => FieldUpdate::Ingredients(expect_ingredients(value)?),
                "instructions" => {
                    FieldUpdate::Instructions(expect_string("instructions", value)?)
                }
                "preparationTime" => {
                    FieldUpdate::PreparationTime(expect_count("preparationTime", value)?)
                }
                other => return Err(PatchError::UnknownField(other.to_string())),
            };
            updates.push(update);
        }
        Ok(Self { updates })
    }

    /// Apply every update onto `recipe`, then re-normalize its ingredients.
    pub fn apply(self, recipe: &mut Recipe) {
        for update in self.updates {
            match update {
                FieldUpdate::Name(v) => recipe.name = v,
                FieldUpdate::Vegetarian(v) => recipe.vegetarian = v,
                FieldUpdate::Servings(v) => recipe.servings = v,
                FieldUpdate::Ingredients(v) => recipe.ingredients = v,
                FieldUpdate::Instructions(v) => recipe.instructions = v,
                FieldUpdate::PreparationTime(v) => recipe.preparation_time = v,
            }
        }
        recipe.ingredients = normalize::normalize_ingredients(recipe.ingredients.take());
    }
}

fn expect_string(field: &'static str, value: &Value) -> Result<String, PatchError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(PatchError::InvalidValue {
            field,
            expected: "a string",
        })
}

fn expect_count(field: &'static str, value: &Value) -> Result<u32, PatchError> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(PatchError::InvalidValue {
            field,
            expected: "a non-negative integer",
        })
}

fn expect_ingredients(value: &Value) -> Result<Option<Vec<String>>, PatchError> {
    let invalid = PatchError::InvalidValue {
        field: "ingredients",
        expected: "an array of strings or null",
    };
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or(invalid.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Err(invalid),
    }
}
