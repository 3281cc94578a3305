// ABOUTME: Storage operations for API tokens
// ABOUTME: Token generation, hashing, verification, and database operations

use base64::Engine;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::types::{ApiToken, TokenGeneration};
use larder_storage::StorageError;

const TOKEN_COLUMNS: &str =
    "t.id, t.user_id, t.token_hash, t.name, t.created_at, t.last_used_at, t.is_active";

pub struct TokenStorage {
    pool: SqlitePool,
}

impl TokenStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random token
    /// Returns a base64-encoded 32-byte token
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a token using SHA-256
    /// This is what gets stored in the database
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a token against a stored hash using constant-time comparison
    pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        use subtle::ConstantTimeEq;

        let computed_hash = Self::hash_token(token);
        computed_hash
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    /// Create a new API token for a user
    pub async fn create_token(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<TokenGeneration, StorageError> {
        let id = Uuid::new_v4().to_string();
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);

        debug!("Creating API token {} for user {}", id, user_id);

        sqlx::query(
            "INSERT INTO api_tokens (id, user_id, token_hash, name, created_at, is_active)
             VALUES (?, ?, ?, ?, ?, 1)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&token_hash)
        .bind(name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(TokenGeneration::new(token, token_hash, id, user_id))
    }

    /// Verify a token and return the token record if valid
    ///
    /// Revoked tokens and tokens of inactive users are not valid.
    pub async fn verify_token(&self, token: &str) -> Result<Option<ApiToken>, StorageError> {
        let token_hash = Self::hash_token(token);

        let row = sqlx::query(&format!(
            "SELECT {TOKEN_COLUMNS}
             FROM api_tokens t
             JOIN users u ON u.id = t.user_id
             WHERE t.token_hash = ? AND t.is_active = 1 AND u.is_active = 1"
        ))
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => {
                let stored_hash: String = row.try_get("token_hash").map_err(StorageError::Sqlx)?;

                // Double-check with constant-time comparison
                if Self::verify_token_hash(token, &stored_hash) {
                    Ok(Some(self.row_to_token(row)?))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Update the last_used_at timestamp for a token
    pub async fn update_last_used(&self, token_hash: &str) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE api_tokens
             SET last_used_at = ?
             WHERE token_hash = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Revoke one of a user's tokens (set is_active = 0)
    pub async fn revoke_token(&self, user_id: i64, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE api_tokens SET is_active = 0 WHERE id = ? AND user_id = ?")
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

    fn row_to_token(&self, row: sqlx::sqlite::SqliteRow) -> Result<ApiToken, StorageError> {
        Ok(ApiToken {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
            token_hash: row.try_get("token_hash").map_err(StorageError::Sqlx)?,
            name: row.try_get("name").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            last_used_at: row.try_get("last_used_at").map_err(StorageError::Sqlx)?,
            is_active: row
                .try_get::<i64, _>("is_active")
                .map_err(StorageError::Sqlx)?
                != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_produces_unique_values() {
        let token1 = TokenStorage::generate_token();
        let token2 = TokenStorage::generate_token();

        assert_ne!(token1, token2);
        assert!(token1.len() > 32); // Base64 of 32 bytes is 43 chars
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        let hash1 = TokenStorage::hash_token("test-token-123");
        let hash2 = TokenStorage::hash_token("test-token-123");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex chars
    }

    #[test]
    fn test_verify_token_hash() {
        let hash = TokenStorage::hash_token("test-token-123");

        assert!(TokenStorage::verify_token_hash("test-token-123", &hash));
        assert!(!TokenStorage::verify_token_hash("test-token-456", &hash));
    }
}
