// ABOUTME: Integration tests for user storage
// ABOUTME: Account creation, credential checks, updates and validation failures

use larder_security::{UserCreateInput, UserStorage, UserUpdateInput};
use larder_storage::{connect_in_memory, StorageError};

fn input(email: &str, password: &str) -> UserCreateInput {
    UserCreateInput {
        email: email.to_string(),
        password: password.to_string(),
        name: "Test Name".to_string(),
    }
}

#[tokio::test]
async fn test_create_user_hashes_password() {
    let storage = UserStorage::new(connect_in_memory().await.unwrap());

    let user = storage
        .create_user(input("test@EXAMPLE.com", "testpass123"))
        .await
        .unwrap();

    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.name, "Test Name");
    assert!(user.is_active);
    assert_ne!(user.password_hash, "testpass123");
}

#[tokio::test]
async fn test_create_user_rejects_duplicate_email() {
    let storage = UserStorage::new(connect_in_memory().await.unwrap());

    storage
        .create_user(input("user@example.com", "testpass123"))
        .await
        .unwrap();
    let result = storage
        .create_user(input("user@example.com", "otherpass123"))
        .await;

    assert!(matches!(result, Err(StorageError::Duplicate(_))));
}

#[tokio::test]
async fn test_create_user_validates_input() {
    let storage = UserStorage::new(connect_in_memory().await.unwrap());

    let short_password = storage.create_user(input("user@example.com", "pw")).await;
    assert!(matches!(short_password, Err(StorageError::Validation(_))));

    let bad_email = storage.create_user(input("not-an-email", "testpass123")).await;
    assert!(matches!(bad_email, Err(StorageError::Validation(_))));

    // Nothing was written
    assert!(storage
        .get_user_by_email("user@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_authenticate() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool.clone());
    let user = storage
        .create_user(input("user@example.com", "testpass123"))
        .await
        .unwrap();

    let ok = storage
        .authenticate("user@example.com", "testpass123")
        .await
        .unwrap();
    assert_eq!(ok.map(|u| u.id), Some(user.id));

    let wrong = storage
        .authenticate("user@example.com", "wrongpass")
        .await
        .unwrap();
    assert!(wrong.is_none());

    let unknown = storage
        .authenticate("nobody@example.com", "testpass123")
        .await
        .unwrap();
    assert!(unknown.is_none());

    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let inactive = storage
        .authenticate("user@example.com", "testpass123")
        .await
        .unwrap();
    assert!(inactive.is_none());
}

#[tokio::test]
async fn test_update_user_name_and_password() {
    let storage = UserStorage::new(connect_in_memory().await.unwrap());
    let user = storage
        .create_user(input("user@example.com", "testpass123"))
        .await
        .unwrap();

    let updated = storage
        .update_user(
            user.id,
            UserUpdateInput {
                name: Some("Updated Name".to_string()),
                password: Some("newpassword123".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Updated Name");
    assert!(storage
        .authenticate("user@example.com", "newpassword123")
        .await
        .unwrap()
        .is_some());
    assert!(storage
        .authenticate("user@example.com", "testpass123")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let storage = UserStorage::new(connect_in_memory().await.unwrap());

    let result = storage
        .update_user(
            42,
            UserUpdateInput {
                name: Some("Ghost".to_string()),
                password: None,
            },
        )
        .await;

    assert!(matches!(result, Err(StorageError::NotFound)));
}
