// ABOUTME: Data layer and persistence for Larder
// ABOUTME: Storage error type, SQLite connection setup and schema migrations

pub mod db;

use thiserror::Error;

pub use db::{connect, connect_in_memory, run_migrations};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(#[from] larder_core::ValidationError),
    #[error("Duplicate value: {0}")]
    Duplicate(String),
    #[error("Password hashing error: {0}")]
    Hash(String),
}

impl StorageError {
    /// Map a unique-constraint violation to `Duplicate`, anything else to `Sqlx`
    pub fn from_insert(err: sqlx::Error, what: impl Into<String>) -> Self {
        let is_unique = err
            .as_database_error()
            .map(|db_err| db_err.is_unique_violation())
            .unwrap_or(false);

        if is_unique {
            StorageError::Duplicate(what.into())
        } else {
            StorageError::Sqlx(err)
        }
    }
}
