//! Subject repository trait.
//!
//! Subjects are owned by the surrounding user-management system. This crate
//! reads identity fields and writes only the verified flag and secret hash,
//! plus the explicit cascade used when a subject is removed.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Subject;
use crate::domain::value_objects::SubjectRemoval;
use crate::errors::DomainError;

/// Repository trait for Subject persistence operations
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Find a subject by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(Subject))` - Subject found
    /// * `Ok(None)` - No subject with this id
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subject>, DomainError>;

    /// Find a subject by email address
    ///
    /// Implementations compare against the normalized (trimmed, lowercase) address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Subject>, DomainError>;

    /// Persist a new subject
    ///
    /// # Errors
    /// * `DomainError::Validation` - Email already registered
    async fn create(&self, subject: Subject) -> Result<Subject, DomainError>;

    /// Set the verified flag. Verification is one-way; there is no inverse.
    ///
    /// # Errors
    /// * `DomainError::NotFound` - Subject doesn't exist
    async fn mark_verified(&self, id: Uuid) -> Result<(), DomainError>;

    /// Replace the stored secret hash
    ///
    /// # Errors
    /// * `DomainError::NotFound` - Subject doesn't exist
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError>;

    /// Delete a subject together with its attendance sessions and verification
    /// codes, all in one transaction
    ///
    /// # Returns
    /// Counts of the rows removed
    ///
    /// # Errors
    /// * `DomainError::NotFound` - Subject doesn't exist (nothing is removed)
    async fn delete_with_dependents(&self, id: Uuid) -> Result<SubjectRemoval, DomainError>;
}
