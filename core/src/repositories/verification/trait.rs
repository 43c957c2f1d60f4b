//! Verification code repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{CodePurpose, VerificationCode};
use crate::errors::DomainError;

/// Repository trait for VerificationCode persistence operations
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Persist a newly issued code. Earlier codes for the same subject and
    /// purpose stay valid until they expire or are consumed.
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError>;

    /// Atomically find and delete a redeemable code
    ///
    /// Matches on subject, purpose and code value with `expires_at > now`. When
    /// several records match, the most recently issued one is consumed. Under
    /// concurrent calls with the same arguments at most one caller receives
    /// the record.
    ///
    /// Consuming a `VerifyAccount` code also sets the subject's verified flag
    /// in the same atomic step. If the flag cannot be written the code stays
    /// in place and the error is returned.
    ///
    /// # Returns
    /// * `Ok(Some(code))` - The consumed record
    /// * `Ok(None)` - Nothing redeemable matched
    async fn consume(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError>;

    /// Unexpired codes for a subject and purpose, newest first
    async fn find_active(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        now: DateTime<Utc>,
    ) -> Result<Vec<VerificationCode>, DomainError>;

    /// Delete every code whose expiry is at or before `now`
    ///
    /// # Returns
    /// Number of codes removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
