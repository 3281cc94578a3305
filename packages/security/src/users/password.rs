// ABOUTME: Password hashing and verification with Argon2id
// ABOUTME: Hashing runs on the blocking pool so request workers stay free

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use larder_storage::StorageError;

/// Hash a password with a fresh random salt, returning a PHC-format string
pub async fn hash_password(password: String) -> Result<String, StorageError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| StorageError::Hash(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| StorageError::Hash(format!("Password hashing task failed: {}", e)))?
}

/// Check a password against a stored PHC hash
///
/// A malformed stored hash is an error; a wrong password is `Ok(false)`.
pub async fn verify_password(password: String, hash: String) -> Result<bool, StorageError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| StorageError::Hash(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| StorageError::Hash(format!("Password verification task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("testpass123".to_string()).await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("testpass123".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrongpass".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let first = hash_password("testpass123".to_string()).await.unwrap();
        let second = hash_password("testpass123".to_string()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_error() {
        let result = verify_password("testpass123".to_string(), "not-a-hash".to_string()).await;
        assert!(result.is_err());
    }

    // Single worker thread: the other task can only run if hashing yields it
    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_does_not_block_other_tasks() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_flag = ran.clone();
        let other = tokio::spawn(async move {
            ran_flag.store(true, Ordering::SeqCst);
        });

        let hashing = tokio::spawn(hash_password("testpass123".to_string()));
        tokio::task::yield_now().await;
        let ran_during_hash = ran.load(Ordering::SeqCst) && !hashing.is_finished();

        hashing.await.unwrap().unwrap();
        other.await.unwrap();
        assert!(ran_during_hash);
    }
}
