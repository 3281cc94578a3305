// ABOUTME: Recipe storage layer using SQLite
// ABOUTME: User-scoped CRUD with transactional tag and ingredient linking

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::cost::Cost;
use crate::types::{Recipe, RecipeCreateInput, RecipeFilter, RecipeUpdateInput};
use larder_core::{validate_name, ValidationError};
use larder_storage::StorageError;
use larder_tags::{Ingredient, LabelCreateInput, LabelRecord, LabelStorage, Tag};

pub struct RecipeStorage {
    pool: SqlitePool,
}

/// Recipe columns before tags and ingredients are attached
struct RecipeRow {
    id: i64,
    user_id: i64,
    title: String,
    cost: Cost,
    time_minutes: i64,
    description: String,
}

impl RecipeStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's recipes, newest first
    ///
    /// Non-empty id lists in `filter` keep recipes linked to any of those ids;
    /// both lists must match when both are given.
    pub async fn list(&self, user_id: i64, filter: &RecipeFilter) -> Result<Vec<Recipe>, StorageError> {
        debug!("Fetching recipes for user {} ({:?})", user_id, filter);

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM recipes r WHERE r.user_id = ");
        query.push_bind(user_id);

        push_link_filter(&mut query, "recipe_tags", "tag_id", &filter.tag_ids);
        push_link_filter(
            &mut query,
            "recipe_ingredients",
            "ingredient_id",
            &filter.ingredient_ids,
        );

        query.push(" ORDER BY r.id DESC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let recipes = rows
            .iter()
            .map(row_to_recipe)
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        attach_labels(&mut *conn, recipes).await
    }

    /// Get one of a user's recipes; another user's recipe is `NotFound`
    pub async fn get(&self, user_id: i64, recipe_id: i64) -> Result<Recipe, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        get_in(&mut *conn, user_id, recipe_id).await
    }

    /// Whether a recipe with this id exists for any user
    pub async fn exists(&self, recipe_id: i64) -> Result<bool, StorageError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(found.is_some())
    }

    /// Create a recipe; tags and ingredients are matched by name or created
    pub async fn create(
        &self,
        user_id: i64,
        input: RecipeCreateInput,
    ) -> Result<Recipe, StorageError> {
        let title = validate_name("title", &input.title)?;
        validate_time_minutes(input.time_minutes)?;

        debug!("Creating recipe '{}' for user {}", title, user_id);

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let result = sqlx::query(
            r#"
            INSERT INTO recipes (user_id, title, cost, time_minutes, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&title)
        .bind(input.cost.to_string())
        .bind(input.time_minutes)
        .bind(input.description.trim())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let recipe_id = result.last_insert_rowid();

        link_labels::<Tag>(&mut *tx, user_id, recipe_id, &input.tags).await?;
        link_labels::<Ingredient>(&mut *tx, user_id, recipe_id, &input.ingredients).await?;

        let recipe = get_in(&mut *tx, user_id, recipe_id).await?;
        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(recipe)
    }

    /// Apply a partial update; absent fields are left as they are
    pub async fn update(
        &self,
        user_id: i64,
        recipe_id: i64,
        input: RecipeUpdateInput,
    ) -> Result<Recipe, StorageError> {
        debug!("Updating recipe: {}", recipe_id);

        let title = input
            .title
            .as_deref()
            .map(|title| validate_name("title", title))
            .transpose()?;
        if let Some(time_minutes) = input.time_minutes {
            validate_time_minutes(time_minutes)?;
        }

        // Column names are literals; values always go through push_bind
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE recipes SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(title) = title {
            query.push(", title = ");
            query.push_bind(title);
        }
        if let Some(cost) = &input.cost {
            query.push(", cost = ");
            query.push_bind(cost.to_string());
        }
        if let Some(time_minutes) = input.time_minutes {
            query.push(", time_minutes = ");
            query.push_bind(time_minutes);
        }
        if let Some(description) = &input.description {
            query.push(", description = ");
            query.push_bind(description.trim().to_string());
        }

        query.push(" WHERE id = ");
        query.push_bind(recipe_id);
        query.push(" AND user_id = ");
        query.push_bind(user_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        // The write comes first so the transaction never has to upgrade a read lock
        let result = query
            .build()
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        if let Some(tags) = &input.tags {
            clear_links::<Tag>(&mut *tx, recipe_id).await?;
            link_labels::<Tag>(&mut *tx, user_id, recipe_id, tags).await?;
        }
        if let Some(ingredients) = &input.ingredients {
            clear_links::<Ingredient>(&mut *tx, recipe_id).await?;
            link_labels::<Ingredient>(&mut *tx, user_id, recipe_id, ingredients).await?;
        }

        let recipe = get_in(&mut *tx, user_id, recipe_id).await?;
        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(recipe)
    }

    /// Delete a recipe; its tags and ingredients stay
    pub async fn delete(&self, user_id: i64, recipe_id: i64) -> Result<(), StorageError> {
        debug!("Deleting recipe: {}", recipe_id);

        let result = sqlx::query("DELETE FROM recipes WHERE id = ? AND user_id = ?")
            .bind(recipe_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

fn validate_time_minutes(time_minutes: i64) -> Result<(), ValidationError> {
    if time_minutes < 0 {
        return Err(ValidationError::invalid("time_minutes", "must not be negative"));
    }
    Ok(())
}

fn push_link_filter(
    query: &mut QueryBuilder<'_, Sqlite>,
    link_table: &str,
    link_column: &str,
    ids: &[i64],
) {
    if ids.is_empty() {
        return;
    }

    query.push(format!(
        " AND EXISTS (SELECT 1 FROM {link_table} x WHERE x.recipe_id = r.id AND x.{link_column} IN ("
    ));
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated("))");
}

async fn get_in(
    conn: &mut SqliteConnection,
    user_id: i64,
    recipe_id: i64,
) -> Result<Recipe, StorageError> {
    debug!("Fetching recipe: {}", recipe_id);

    let row = sqlx::query("SELECT * FROM recipes WHERE id = ? AND user_id = ?")
        .bind(recipe_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?
        .ok_or(StorageError::NotFound)?;

    let recipe = row_to_recipe(&row)?;
    attach_labels(conn, vec![recipe])
        .await?
        .pop()
        .ok_or(StorageError::NotFound)
}

/// Resolve each name to the owner's label (creating it if needed) and link it
async fn link_labels<L: LabelRecord>(
    conn: &mut SqliteConnection,
    user_id: i64,
    recipe_id: i64,
    labels: &[LabelCreateInput],
) -> Result<(), StorageError> {
    let kind = L::KIND;
    let insert = format!(
        "INSERT OR IGNORE INTO {} (recipe_id, {}) VALUES (?, ?)",
        kind.link_table(),
        kind.link_column()
    );

    for label in labels {
        let record = LabelStorage::<L>::get_or_create(&mut *conn, user_id, &label.name).await?;

        sqlx::query(&insert)
            .bind(recipe_id)
            .bind(record.id())
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;
    }

    Ok(())
}

async fn clear_links<L: LabelRecord>(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE recipe_id = ?",
        L::KIND.link_table()
    ))
    .bind(recipe_id)
    .execute(&mut *conn)
    .await
    .map_err(StorageError::Sqlx)?;

    Ok(())
}

/// Load the labels linked to any of `recipe_ids`, grouped by recipe
async fn load_labels<L: LabelRecord>(
    conn: &mut SqliteConnection,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<L>>, StorageError> {
    let mut grouped: HashMap<i64, Vec<L>> = HashMap::new();
    if recipe_ids.is_empty() {
        return Ok(grouped);
    }

    let kind = L::KIND;
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT x.recipe_id, l.id, l.user_id, l.name FROM {link} x \
         JOIN {table} l ON l.id = x.{column} WHERE x.recipe_id IN (",
        link = kind.link_table(),
        table = kind.table(),
        column = kind.link_column(),
    ));
    let mut separated = query.separated(", ");
    for id in recipe_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY l.id");

    let rows = query
        .build()
        .fetch_all(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

    for row in rows {
        let recipe_id: i64 = row.try_get("recipe_id").map_err(StorageError::Sqlx)?;
        let label = L::from_parts(
            row.try_get("id").map_err(StorageError::Sqlx)?,
            row.try_get("user_id").map_err(StorageError::Sqlx)?,
            row.try_get("name").map_err(StorageError::Sqlx)?,
        );
        grouped.entry(recipe_id).or_default().push(label);
    }

    Ok(grouped)
}

async fn attach_labels(
    conn: &mut SqliteConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, StorageError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut tags = load_labels::<Tag>(conn, &ids).await?;
    let mut ingredients = load_labels::<Ingredient>(conn, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| Recipe {
            tags: tags.remove(&row.id).unwrap_or_default(),
            ingredients: ingredients.remove(&row.id).unwrap_or_default(),
            id: row.id,
            title: row.title,
            cost: row.cost,
            time_minutes: row.time_minutes,
            description: row.description,
            user_id: row.user_id,
        })
        .collect())
}

fn row_to_recipe(row: &sqlx::sqlite::SqliteRow) -> Result<RecipeRow, StorageError> {
    let cost: String = row.try_get("cost").map_err(StorageError::Sqlx)?;

    Ok(RecipeRow {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        cost: cost
            .parse()
            .map_err(|e| StorageError::Database(format!("Corrupt recipe cost '{}': {}", cost, e)))?,
        time_minutes: row.try_get("time_minutes").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
    })
}
