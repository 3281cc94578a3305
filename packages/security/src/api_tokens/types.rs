// ABOUTME: Type definitions for API token authentication
// ABOUTME: Structures for token generation, storage, and validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API token stored in database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    pub id: String,
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Token generation result - includes plaintext token for display
/// This is the ONLY time the plaintext token is available
#[derive(Debug, Clone)]
pub struct TokenGeneration {
    pub token: String,      // Plaintext token - hand to the user once
    pub token_hash: String, // Hash to store in database
    pub id: String,
    pub user_id: i64,
}

impl TokenGeneration {
    pub fn new(token: String, token_hash: String, id: String, user_id: i64) -> Self {
        Self {
            token,
            token_hash,
            id,
            user_id,
        }
    }
}
