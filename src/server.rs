//! Recipe HTTP server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST`   | `/recipes` | Create a recipe (`201`, `Location: /recipes/{id}`) |
//! | `GET`    | `/recipes` | List recipes, optionally filtered |
//! | `GET`    | `/recipes/{id}` | Fetch one recipe |
//! | `PUT`    | `/recipes/{id}` | Replace every field of a recipe |
//! | `PATCH`  | `/recipes/{id}` | Merge a partial update |
//! | `DELETE` | `/recipes/{id}` | Delete a recipe (`204`) |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! `GET /recipes` accepts `vegetarian`, `servings`, `include`, `exclude`,
//! `text` and `preparationTime`; see [`crate::search::parse_query`].
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Recipe not found with id: 99" } }
//! ```
//!
//! Error codes: `bad_request` (400), `validation_error` (400),
//! `invalid_patch` (400), `not_found` (404), `internal` (500).

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, RawQuery, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use recipe_core::models::{Recipe, RecipeId};
use recipe_core::patch::MergePatch;
use recipe_core::store::memory::InMemoryStore;
use recipe_core::store::RecipeStore;
use recipe_core::{RecipeError, RecipeService};

use crate::config::Config;
use crate::search::parse_query;
use crate::sqlite_store::SqliteStore;
use crate::{db, migrate};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    service: RecipeService,
}

/// Build a [`RecipeService`] over the store selected by `[db].backend`.
///
/// The SQLite backend runs migrations first, so a fresh database file is
/// usable without a separate `recipes init`.
pub async fn open_service(config: &Config) -> anyhow::Result<RecipeService> {
    let store: Arc<dyn RecipeStore> = if config.db.is_memory() {
        tracing::warn!("using in-memory store; recipes are lost on shutdown");
        Arc::new(InMemoryStore::new())
    } else {
        let pool = db::connect(config).await?;
        migrate::apply(&pool).await?;
        Arc::new(SqliteStore::new(pool))
    };
    Ok(RecipeService::new(store))
}

/// Build the application router around an existing service.
pub fn router(service: RecipeService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recipes", get(handle_search).post(handle_create))
        .route(
            "/recipes/{id}",
            get(handle_get)
                .put(handle_update)
                .patch(handle_patch)
                .delete(handle_delete),
        )
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

/// Starts the HTTP server on `[server].bind`.
///
/// Runs until the process is terminated. Returns an error if the store cannot
/// be opened or the address cannot be bound.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("recipe server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn validation_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "validation_error",
        message: message.into(),
    }
}

fn not_found(id: RecipeId) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: RecipeError::NotFound(id).to_string(),
    }
}

impl From<RecipeError> for AppError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::NotFound(id) => not_found(id),
            RecipeError::Patch(e) => AppError {
                status: StatusCode::BAD_REQUEST,
                code: "invalid_patch",
                message: e.to_string(),
            },
            RecipeError::Store(e) => {
                tracing::warn!(error = %e, "store failure");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "internal",
                    message: "internal server error".to_string(),
                }
            }
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        validation_error(rejection.body_text())
    }
}

/// Structural checks on a create/update body beyond what deserialization
/// already enforces.
fn validate_recipe(recipe: &Recipe) -> Result<(), AppError> {
    if recipe.name.trim().is_empty() {
        return Err(validation_error("name must not be blank"));
    }
    Ok(())
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ /recipes ============

async fn handle_create(
    State(state): State<AppState>,
    body: Result<Json<Recipe>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(recipe) = body?;
    validate_recipe(&recipe)?;

    let saved = state.service.create(recipe).await?;
    let location = format!("/recipes/{}", saved.id.unwrap_or_default());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(saved),
    ))
}

async fn handle_search(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Recipe>>, AppError> {
    let filter = parse_query(query.as_deref()).map_err(bad_request)?;
    let recipes = state.service.find_all(&filter.build()).await?;
    Ok(Json(recipes))
}

async fn handle_get(
    State(state): State<AppState>,
    id: Result<Path<RecipeId>, PathRejection>,
) -> Result<Json<Recipe>, AppError> {
    let Path(id) = id?;
    state
        .service
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn handle_update(
    State(state): State<AppState>,
    id: Result<Path<RecipeId>, PathRejection>,
    body: Result<Json<Recipe>, JsonRejection>,
) -> Result<Json<Recipe>, AppError> {
    let Path(id) = id?;
    let Json(recipe) = body?;
    validate_recipe(&recipe)?;

    Ok(Json(state.service.update(id, recipe).await?))
}

async fn handle_patch(
    State(state): State<AppState>,
    id: Result<Path<RecipeId>, PathRejection>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Recipe>, AppError> {
    let Path(id) = id?;
    let Json(payload) = body?;
    let patch = MergePatch::from_json(&payload).map_err(RecipeError::from)?;

    Ok(Json(state.service.partial_update(id, patch).await?))
}

async fn handle_delete(
    State(state): State<AppState>,
    id: Result<Path<RecipeId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
