// ABOUTME: User management module
// ABOUTME: Provides types, password hashing and storage for user accounts

pub mod password;
pub mod storage;
pub mod types;

pub use storage::UserStorage;
pub use types::*;
