//! Secret hashing on the blocking pool

use crate::errors::{DomainError, DomainResult};

/// Hash a secret with bcrypt at the given cost
pub async fn hash_secret(secret: &str, cost: u32) -> DomainResult<String> {
    let secret = secret.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(secret, cost))
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Hashing task failed: {}", e),
        })?
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to hash secret: {}", e),
        })
}

/// Check a secret against a stored bcrypt hash
///
/// A stored hash that cannot be parsed is reported as an internal error,
/// not as a mismatch.
pub async fn verify_secret(secret: &str, hash: &str) -> DomainResult<bool> {
    let secret = secret.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(secret, &hash))
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Hashing task failed: {}", e),
        })?
        .map_err(|e| DomainError::Internal {
            message: format!("Stored secret hash is unreadable: {}", e),
        })
}
