// ABOUTME: Shared database state handed to every API handler
// ABOUTME: Holds the SQLite pool plus one storage handle per resource

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use larder_recipes::RecipeStorage;
use larder_security::{TokenStorage, UserStorage};
use larder_storage::StorageError;
use larder_tags::{IngredientStorage, TagStorage};

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub user_storage: Arc<UserStorage>,
    pub token_storage: Arc<TokenStorage>,
    pub tag_storage: Arc<TagStorage>,
    pub ingredient_storage: Arc<IngredientStorage>,
    pub recipe_storage: Arc<RecipeStorage>,
}

impl DbState {
    /// Create state from an already migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_storage: Arc::new(UserStorage::new(pool.clone())),
            token_storage: Arc::new(TokenStorage::new(pool.clone())),
            tag_storage: Arc::new(TagStorage::new(pool.clone())),
            ingredient_storage: Arc::new(IngredientStorage::new(pool.clone())),
            recipe_storage: Arc::new(RecipeStorage::new(pool.clone())),
            pool,
        }
    }

    /// Open (and migrate) the database, defaulting to `~/.larder/larder.db`
    pub async fn init_with_path(database_path: Option<PathBuf>) -> Result<Self, StorageError> {
        let database_path = database_path.unwrap_or_else(larder_core::database_file);
        let pool = larder_storage::connect(&database_path).await?;

        info!("Database ready at {}", database_path.display());
        Ok(Self::new(pool))
    }

    /// Fresh in-memory database, used by tests
    pub async fn in_memory() -> Result<Self, StorageError> {
        let pool = larder_storage::connect_in_memory().await?;
        Ok(Self::new(pool))
    }
}
