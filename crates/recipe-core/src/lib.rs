//! # Recipe Core
//!
//! Storage-agnostic logic for Recipe Manager: the recipe model, ingredient
//! normalization, filter predicates, merge patches, the store abstraction,
//! and the service that ties them together.
//!
//! This crate contains no sqlx, axum, or filesystem I/O. Persistence is
//! reached only through the [`store::RecipeStore`] trait.

pub mod error;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod patch;
pub mod service;
pub mod store;

pub use error::{PatchError, RecipeError};
pub use filter::{Criterion, Filter, Predicate, RecipeFilter};
pub use models::{Recipe, RecipeId};
pub use patch::{FieldUpdate, MergePatch};
pub use service::RecipeService;
pub use store::RecipeStore;
