//! # Recipe Manager
//!
//! A recipe store with composable search filters and merge-style partial
//! updates, served over HTTP and usable from the `recipes` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────────┐   ┌──────────┐
//! │   HTTP   │──▶│  search  │──▶│ RecipeService │──▶│  SQLite  │
//! │  (axum)  │   │  params  │   │ (recipe-core) │   │ / memory │
//! └──────────┘   └──────────┘   └───────────────┘   └──────────┘
//! ```
//!
//! Normalization, filter composition, and merge patches live in
//! [`recipe_core`]; this crate supplies configuration, persistence, and the
//! HTTP and CLI boundaries.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Database schema migrations (idempotent) |
//! | [`sqlite_store`] | SQLite `RecipeStore` with predicate → SQL translation |
//! | [`search`] | Query-string parsing and the `search` command |
//! | [`get`] | The `get` command |
//! | [`server`] | Axum HTTP server |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod db;
pub mod get;
pub mod logging;
pub mod migrate;
pub mod search;
pub mod server;
pub mod sqlite_store;

pub use recipe_core::store;
pub use recipe_core::{Recipe, RecipeError, RecipeFilter, RecipeService};
