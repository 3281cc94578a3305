// ABOUTME: Integration tests for API token storage
// ABOUTME: Token issue, verification, revocation and last-used tracking

use chrono::Utc;
use larder_security::{TokenStorage, User, UserCreateInput, UserStorage};
use larder_storage::{connect_in_memory, StorageError};
use sqlx::SqlitePool;

async fn setup() -> (SqlitePool, User) {
    let pool = connect_in_memory().await.unwrap();
    let user = UserStorage::new(pool.clone())
        .create_user(UserCreateInput {
            email: "user@example.com".to_string(),
            password: "testpass123".to_string(),
            name: String::new(),
        })
        .await
        .unwrap();
    (pool, user)
}

#[tokio::test]
async fn test_create_and_verify_token() {
    let (pool, user) = setup().await;
    let storage = TokenStorage::new(pool);

    let generated = storage.create_token(user.id, "cli").await.unwrap();
    assert_eq!(generated.user_id, user.id);
    assert_eq!(generated.token_hash, TokenStorage::hash_token(&generated.token));

    let verified = storage.verify_token(&generated.token).await.unwrap();
    let verified = verified.expect("token should verify");
    assert_eq!(verified.user_id, user.id);
    assert_eq!(verified.name, "cli");
    assert!(verified.last_used_at.is_none());
}

#[tokio::test]
async fn test_unknown_token_is_rejected() {
    let (pool, _user) = setup().await;
    let storage = TokenStorage::new(pool);

    assert!(storage.verify_token("not-a-token").await.unwrap().is_none());
}

#[tokio::test]
async fn test_revoked_token_is_rejected() {
    let (pool, user) = setup().await;
    let storage = TokenStorage::new(pool);

    let generated = storage.create_token(user.id, "cli").await.unwrap();
    storage.revoke_token(user.id, &generated.id).await.unwrap();

    assert!(storage.verify_token(&generated.token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_revoke_other_users_token_is_not_found() {
    let (pool, user) = setup().await;
    let storage = TokenStorage::new(pool);

    let generated = storage.create_token(user.id, "cli").await.unwrap();
    let result = storage.revoke_token(user.id + 1, &generated.id).await;

    assert!(matches!(result, Err(StorageError::NotFound)));
    assert!(storage.verify_token(&generated.token).await.unwrap().is_some());
}

#[tokio::test]
async fn test_inactive_user_token_is_rejected() {
    let (pool, user) = setup().await;
    let storage = TokenStorage::new(pool.clone());

    let generated = storage.create_token(user.id, "cli").await.unwrap();
    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(storage.verify_token(&generated.token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_last_used() {
    let (pool, user) = setup().await;
    let storage = TokenStorage::new(pool);

    let generated = storage.create_token(user.id, "cli").await.unwrap();
    let before = Utc::now();
    storage
        .update_last_used(&generated.token_hash)
        .await
        .unwrap();

    let token = storage.verify_token(&generated.token).await.unwrap().unwrap();
    let last_used = token.last_used_at.expect("last_used_at should be set");
    assert!(last_used >= before);
    assert!(token.created_at <= last_used);
}
