//! SQLite-backed [`RecipeStore`] implementation.
//!
//! Recipes live in `recipes`; their ordered ingredient lists live in
//! `recipe_ingredients`. Predicates are compiled into a `WHERE` clause:
//!
//! | Criterion | SQL |
//! |-----------|-----|
//! | `VegetarianIs` / `ServingsIs` / `PreparationTimeIs` | `r.col = ?` |
//! | `HasIngredient` | `EXISTS (SELECT 1 FROM recipe_ingredients ...)` |
//! | `LacksIngredient` | `NOT EXISTS (SELECT 1 FROM recipe_ingredients ...)` |
//! | `InstructionsContain` | none, applied to loaded rows |
//!
//! SQLite's `lower()` only folds ASCII, so instruction text search runs in
//! Rust through [`Criterion::matches`] on the rows the SQL clauses return.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use recipe_core::filter::{Criterion, Predicate};
use recipe_core::models::{Recipe, RecipeId};
use recipe_core::store::RecipeStore;

/// Ids bound per ingredient lookup. SQLite caps bind variables at 32766.
const HYDRATE_BATCH: usize = 500;

const SELECT_RECIPES: &str = "SELECT r.id, r.name, r.vegetarian, r.servings, r.instructions, \
     r.preparation_time, r.has_ingredients FROM recipes r";

/// SQLite implementation of the [`RecipeStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Attach ingredient lists to freshly loaded recipe rows.
    async fn hydrate(&self, rows: Vec<SqliteRow>) -> Result<Vec<Recipe>> {
        let mut recipes = rows
            .iter()
            .map(recipe_from_row)
            .collect::<Result<Vec<_>>>()?;
        if recipes.is_empty() {
            return Ok(recipes);
        }

        let mut by_recipe: HashMap<RecipeId, Vec<String>> = HashMap::new();
        for batch in recipes.chunks(HYDRATE_BATCH) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "SELECT recipe_id, ingredient FROM recipe_ingredients WHERE recipe_id IN (",
            );
            let mut ids = qb.separated(", ");
            for recipe in batch {
                ids.push_bind(recipe.id);
            }
            qb.push(") ORDER BY recipe_id, position");

            for row in qb.build().fetch_all(&self.pool).await? {
                let recipe_id: RecipeId = row.try_get("recipe_id")?;
                let ingredient: String = row.try_get("ingredient")?;
                by_recipe.entry(recipe_id).or_default().push(ingredient);
            }
        }

        for recipe in &mut recipes {
            if recipe.ingredients.is_some() {
                let id = recipe.id.unwrap_or_default();
                recipe.ingredients = Some(by_recipe.remove(&id).unwrap_or_default());
            }
        }
        Ok(recipes)
    }
}

/// Build a recipe from a `recipes` row. `ingredients` is `Some(vec![])`
/// when the row says a list is present; [`SqliteStore::hydrate`] fills it.
fn recipe_from_row(row: &SqliteRow) -> Result<Recipe> {
    let servings: i64 = row.try_get("servings")?;
    let preparation_time: i64 = row.try_get("preparation_time")?;
    let has_ingredients: bool = row.try_get("has_ingredients")?;
    Ok(Recipe {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
        vegetarian: row.try_get("vegetarian")?,
        servings: u32::try_from(servings).context("stored servings out of range")?,
        ingredients: has_ingredients.then(Vec::new),
        instructions: row.try_get("instructions")?,
        preparation_time: u32::try_from(preparation_time)
            .context("stored preparation_time out of range")?,
    })
}

/// Whether `criterion` can be expressed in SQL with the same semantics as
/// [`Criterion::matches`].
fn compiles_to_sql(criterion: &Criterion) -> bool {
    !matches!(criterion, Criterion::InstructionsContain(_))
}

fn push_criterion(qb: &mut QueryBuilder<'_, Sqlite>, criterion: &Criterion) {
    match criterion {
        Criterion::VegetarianIs(v) => {
            qb.push("r.vegetarian = ").push_bind(*v);
        }
        Criterion::ServingsIs(n) => {
            qb.push("r.servings = ").push_bind(i64::from(*n));
        }
        Criterion::HasIngredient(i) => {
            qb.push(
                "EXISTS (SELECT 1 FROM recipe_ingredients ri \
                 WHERE ri.recipe_id = r.id AND ri.ingredient = ",
            )
            .push_bind(i.clone())
            .push(")");
        }
        Criterion::LacksIngredient(i) => {
            qb.push(
                "NOT EXISTS (SELECT 1 FROM recipe_ingredients ri \
                 WHERE ri.recipe_id = r.id AND ri.ingredient = ",
            )
            .push_bind(i.clone())
            .push(")");
        }
        Criterion::InstructionsContain(_) => {
            // Matched on the loaded rows instead
            qb.push("1");
        }
        Criterion::PreparationTimeIs(m) => {
            qb.push("r.preparation_time = ").push_bind(i64::from(*m));
        }
    }
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>> {
        let sql = format!("{} WHERE r.id = ?", SELECT_RECIPES);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn exists_by_id(&self, id: RecipeId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM recipes WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save(&self, mut recipe: Recipe) -> Result<Recipe> {
        let mut tx = self.pool.begin().await?;

        let id = match recipe.id {
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO recipes (id, name, vegetarian, servings, instructions,
                                         preparation_time, has_ingredients)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        vegetarian = excluded.vegetarian,
                        servings = excluded.servings,
                        instructions = excluded.instructions,
                        preparation_time = excluded.preparation_time,
                        has_ingredients = excluded.has_ingredients
                    "#,
                )
                .bind(id)
                .bind(&recipe.name)
                .bind(recipe.vegetarian)
                .bind(i64::from(recipe.servings))
                .bind(&recipe.instructions)
                .bind(i64::from(recipe.preparation_time))
                .bind(recipe.ingredients.is_some())
                .execute(&mut *tx)
                .await?;
                id
            }
            None => sqlx::query(
                r#"
                INSERT INTO recipes (name, vegetarian, servings, instructions,
                                     preparation_time, has_ingredients)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&recipe.name)
            .bind(recipe.vegetarian)
            .bind(i64::from(recipe.servings))
            .bind(&recipe.instructions)
            .bind(i64::from(recipe.preparation_time))
            .bind(recipe.ingredients.is_some())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid(),
        };

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(ingredients) = &recipe.ingredients {
            for (position, ingredient) in ingredients.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO recipe_ingredients (recipe_id, position, ingredient) VALUES (?, ?, ?)",
                )
                .bind(id)
                .bind(position as i64)
                .bind(ingredient)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        recipe.id = Some(id);
        Ok(recipe)
    }

    async fn delete_by_id(&self, id: RecipeId) -> Result<()> {
        // Ingredient rows go with it through ON DELETE CASCADE
        sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Recipe>> {
        let sql = format!("{} ORDER BY r.id ASC", SELECT_RECIPES);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await?;
        self.hydrate(rows).await
    }

    async fn find_matching(&self, predicate: &Predicate) -> Result<Vec<Recipe>> {
        let (in_sql, in_rust): (Vec<&Criterion>, Vec<&Criterion>) =
            predicate.clauses().iter().partition(|c| compiles_to_sql(c));

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_RECIPES);
        for (i, criterion) in in_sql.into_iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            push_criterion(&mut qb, criterion);
        }
        qb.push(" ORDER BY r.id ASC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut recipes = self.hydrate(rows).await?;
        recipes.retain(|recipe| in_rust.iter().all(|c| c.matches(recipe)));
        Ok(recipes)
    }
}
