// ABOUTME: API token module
// ABOUTME: Per-user bearer tokens, stored only as SHA-256 hashes

pub mod storage;
pub mod types;

pub use storage::TokenStorage;
pub use types::{ApiToken, TokenGeneration};
