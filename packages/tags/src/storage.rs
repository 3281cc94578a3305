// ABOUTME: Tag and ingredient storage layer using SQLite
// ABOUTME: User-scoped CRUD plus the assigned-to-a-recipe filter

use std::marker::PhantomData;

use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::types::{
    Ingredient, LabelCreateInput, LabelFilter, LabelRecord, LabelUpdateInput, Tag,
};
use larder_core::validate_name;
use larder_storage::StorageError;

/// Storage for one label table; every query is scoped to the owning user
pub struct LabelStorage<L> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> L>,
}

pub type TagStorage = LabelStorage<Tag>;
pub type IngredientStorage = LabelStorage<Ingredient>;

impl<L: LabelRecord> LabelStorage<L> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    /// List a user's labels ordered by name descending
    ///
    /// With `assigned_only` set, only labels linked to at least one of the
    /// user's recipes are returned, each exactly once.
    pub async fn list(&self, user_id: i64, filter: LabelFilter) -> Result<Vec<L>, StorageError> {
        let kind = L::KIND;
        debug!(
            "Fetching {}s for user {} (assigned_only: {})",
            kind.label(),
            user_id,
            filter.assigned_only
        );

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT l.id, l.user_id, l.name FROM {} l WHERE l.user_id = ",
            kind.table()
        ));
        query.push_bind(user_id);

        // EXISTS rather than a join keeps a label linked to many recipes to one row
        if filter.assigned_only {
            query.push(format!(
                " AND EXISTS (SELECT 1 FROM {link} x JOIN recipes r ON r.id = x.recipe_id \
                 WHERE x.{column} = l.id AND r.user_id = l.user_id)",
                link = kind.link_table(),
                column = kind.link_column(),
            ));
        }

        // Case-insensitive first; the exact name then id keep the order total
        query.push(" ORDER BY l.name COLLATE NOCASE DESC, l.name DESC, l.id DESC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_label::<L>).collect()
    }

    /// Get one of a user's labels; another user's label is `NotFound`
    pub async fn get(&self, user_id: i64, id: i64) -> Result<L, StorageError> {
        debug!("Fetching {}: {}", L::KIND.label(), id);

        let row = sqlx::query(&format!(
            "SELECT id, user_id, name FROM {} WHERE id = ? AND user_id = ?",
            L::KIND.table()
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?
        .ok_or(StorageError::NotFound)?;

        row_to_label(&row)
    }

    /// Whether a label with this id exists for any user
    pub async fn exists(&self, id: i64) -> Result<bool, StorageError> {
        let found: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM {} WHERE id = ?",
            L::KIND.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(found.is_some())
    }

    /// Find a user's label by exact name
    pub async fn find_by_name(&self, user_id: i64, name: &str) -> Result<Option<L>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        find_by_name_in::<L>(&mut *conn, user_id, name).await
    }

    pub async fn create(&self, user_id: i64, input: LabelCreateInput) -> Result<L, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        insert_in::<L>(&mut *conn, user_id, &input.name).await
    }

    /// Apply a partial update; absent fields are left as they are
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: LabelUpdateInput,
    ) -> Result<L, StorageError> {
        debug!("Updating {}: {}", L::KIND.label(), id);

        let Some(name) = input.name else {
            return self.get(user_id, id).await;
        };
        let name = validate_name("name", &name)?;

        let result = sqlx::query(&format!(
            "UPDATE {} SET name = ? WHERE id = ? AND user_id = ?",
            L::KIND.table()
        ))
        .bind(&name)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get(user_id, id).await
    }

    /// Delete a label together with its recipe links
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), StorageError> {
        debug!("Deleting {}: {}", L::KIND.label(), id);

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = ? AND user_id = ?",
            L::KIND.table()
        ))
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Return the user's label with this name, creating it when absent
    ///
    /// Takes a connection so callers can run it inside their own transaction.
    pub async fn get_or_create(
        conn: &mut SqliteConnection,
        user_id: i64,
        name: &str,
    ) -> Result<L, StorageError> {
        let name = validate_name("name", name)?;

        match find_by_name_in::<L>(conn, user_id, &name).await? {
            Some(existing) => Ok(existing),
            None => insert_in::<L>(conn, user_id, &name).await,
        }
    }
}

async fn find_by_name_in<L: LabelRecord>(
    conn: &mut SqliteConnection,
    user_id: i64,
    name: &str,
) -> Result<Option<L>, StorageError> {
    let row = sqlx::query(&format!(
        "SELECT id, user_id, name FROM {} WHERE user_id = ? AND name = ? ORDER BY id LIMIT 1",
        L::KIND.table()
    ))
    .bind(user_id)
    .bind(name.trim())
    .fetch_optional(&mut *conn)
    .await
    .map_err(StorageError::Sqlx)?;

    row.as_ref().map(row_to_label::<L>).transpose()
}

async fn insert_in<L: LabelRecord>(
    conn: &mut SqliteConnection,
    user_id: i64,
    name: &str,
) -> Result<L, StorageError> {
    let name = validate_name("name", name)?;
    debug!("Creating {} '{}' for user {}", L::KIND.label(), name, user_id);

    let result = sqlx::query(&format!(
        "INSERT INTO {} (user_id, name, created_at) VALUES (?, ?, ?)",
        L::KIND.table()
    ))
    .bind(user_id)
    .bind(&name)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(StorageError::Sqlx)?;

    Ok(L::from_parts(result.last_insert_rowid(), user_id, name))
}

fn row_to_label<L: LabelRecord>(row: &sqlx::sqlite::SqliteRow) -> Result<L, StorageError> {
    Ok(L::from_parts(
        row.try_get("id").map_err(StorageError::Sqlx)?,
        row.try_get("user_id").map_err(StorageError::Sqlx)?,
        row.try_get("name").map_err(StorageError::Sqlx)?,
    ))
}
