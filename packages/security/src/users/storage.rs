// ABOUTME: User storage layer using SQLite
// ABOUTME: Handles account creation, credential checks and profile updates

use chrono::Utc;
use sqlx::{QueryBuilder, Row, SqlitePool};
use tracing::debug;

use super::password::{hash_password, verify_password};
use super::types::{User, UserCreateInput, UserUpdateInput};
use larder_core::{validate_email, validate_password, MAX_NAME_LENGTH};
use larder_core::ValidationError;
use larder_storage::StorageError;

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with a hashed password
    pub async fn create_user(&self, input: UserCreateInput) -> Result<User, StorageError> {
        let email = validate_email(&input.email)?;
        validate_password(&input.password)?;
        let name = validate_display_name(&input.name)?;

        debug!("Creating user: {}", email);

        let password_hash = hash_password(input.password.clone()).await?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash, is_active, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&email)
        .bind(&name)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_insert(e, format!("user with email '{}'", email)))?;

        self.get_user(result.last_insert_rowid()).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        self.row_to_user(&row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let email = larder_core::normalize_email(email);
        debug!("Fetching user by email: {}", email);

        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(r) => Ok(Some(self.row_to_user(&r)?)),
            None => Ok(None),
        }
    }

    /// Check an email/password pair, returning the user only if it is active
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        let user = match self.get_user_by_email(email).await? {
            Some(user) if user.is_active => user,
            _ => return Ok(None),
        };

        if verify_password(password.to_string(), user.password_hash.clone()).await? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        input: UserUpdateInput,
    ) -> Result<User, StorageError> {
        debug!("Updating user: {}", user_id);

        // Column names are literals; values always go through push_bind
        let mut query_builder = QueryBuilder::new("UPDATE users SET updated_at = ");
        query_builder.push_bind(Utc::now());
        let mut has_updates = false;

        if let Some(name) = &input.name {
            query_builder.push(", name = ");
            query_builder.push_bind(validate_display_name(name)?);
            has_updates = true;
        }
        if let Some(password) = &input.password {
            validate_password(password)?;
            query_builder.push(", password_hash = ");
            query_builder.push_bind(hash_password(password.clone()).await?);
            has_updates = true;
        }

        if !has_updates {
            return self.get_user(user_id).await;
        }

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(user_id);

        let result = query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_user(user_id).await
    }

    fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            password_hash: row.try_get("password_hash")?,
            is_active: row.try_get::<i64, _>("is_active")? != 0,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Display names may be empty but not longer than `MAX_NAME_LENGTH`
fn validate_display_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(name.to_string())
}
