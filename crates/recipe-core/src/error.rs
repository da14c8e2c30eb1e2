//! Error types returned by the recipe service.

use thiserror::Error;

use crate::models::RecipeId;

/// Failure while turning a JSON payload into a merge patch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("patch payload must be a JSON object")]
    NotAnObject,

    #[error("unknown field in patch: {0}")]
    UnknownField(String),

    #[error("invalid value for field '{field}': expected {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },
}

/// Errors surfaced by [`RecipeService`](crate::service::RecipeService).
#[derive(Debug, Error)]
pub enum RecipeError {
    /// A mutation targeted an id that does not exist.
    #[error("Recipe not found with id: {0}")]
    NotFound(RecipeId),

    #[error("failed to apply patch: {0}")]
    Patch(#[from] PatchError),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T, E = RecipeError> = std::result::Result<T, E>;
