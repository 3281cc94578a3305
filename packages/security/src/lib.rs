// ABOUTME: Authentication for Larder
// ABOUTME: User accounts with argon2 password hashes and hashed API tokens

pub mod api_tokens;
pub mod users;

// Re-export main types for convenience
pub use api_tokens::{ApiToken, TokenGeneration, TokenStorage};
pub use users::{PublicUser, User, UserCreateInput, UserStorage, UserUpdateInput};
