//! Main verification service implementation

use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use wf_shared::utils::validation::validators::is_numeric_code;

use crate::domain::clock::Clock;
use crate::domain::entities::{CodePurpose, VerificationCode, CODE_LENGTH};
use crate::errors::{AuthError, DomainResult, ValidationError};
use crate::repositories::VerificationCodeRepository;

use super::config::VerificationServiceConfig;

/// Issues and redeems single-use verification codes
pub struct VerificationService<V: VerificationCodeRepository> {
    /// Code store providing atomic consumption and verification
    code_repository: Arc<V>,
    /// Time source for issue and expiry decisions
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<V: VerificationCodeRepository> VerificationService<V> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `code_repository` - Verification code store
    /// * `clock` - Time source
    /// * `config` - Service configuration
    pub fn new(
        code_repository: Arc<V>,
        clock: Arc<dyn Clock>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            code_repository,
            clock,
            config,
        }
    }

    /// Issue a new code for `subject_id` that expires after `ttl`
    ///
    /// Outstanding codes for the same subject and purpose are left in place;
    /// validation always prefers the most recently issued match.
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationCode)` - The stored record, including the plaintext
    ///   code for mail delivery
    /// * `Err(ValidationError::InvalidDate)` - `ttl` pushes the expiry past
    ///   the representable range
    pub async fn issue(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        ttl: Duration,
    ) -> DomainResult<VerificationCode> {
        let now = self.clock.now();
        if VerificationCode::expiry_for(now, ttl).is_none() {
            return Err(ValidationError::InvalidDate {
                field: "ttl".to_string(),
            }
            .into());
        }

        let record = VerificationCode::new(
            subject_id,
            purpose,
            VerificationCode::generate_code(),
            now,
            ttl,
        );

        let record = self.code_repository.create(record).await.map_err(|e| {
            tracing::error!(
                subject_id = %subject_id,
                purpose = %purpose,
                error = %e,
                event = "code_storage_failed",
                "Failed to store verification code"
            );
            e
        })?;

        tracing::info!(
            subject_id = %subject_id,
            purpose = %purpose,
            code_id = %record.id,
            expires_at = %record.expires_at,
            event = "code_issued",
            "Issued verification code"
        );

        Ok(record)
    }

    /// Issue a code using the configured lifetime for `purpose`
    pub async fn issue_for(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
    ) -> DomainResult<VerificationCode> {
        self.issue(subject_id, purpose, self.config.ttl_for(purpose))
            .await
    }

    /// Redeem a code
    ///
    /// Consumes the newest unexpired code matching subject, purpose and value.
    /// For account verification the store sets the subject's verified flag in
    /// the same step, so a failure leaves both the code and the flag untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The code was valid and has been consumed
    /// * `Err(AuthError::InvalidOrExpiredCode)` - Wrong, expired or already
    ///   consumed; the cause is not distinguished
    pub async fn validate(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        code: &str,
    ) -> DomainResult<bool> {
        if !is_numeric_code(code, CODE_LENGTH) {
            tracing::warn!(
                subject_id = %subject_id,
                purpose = %purpose,
                event = "code_rejected",
                reason = "malformed",
                "Rejected malformed verification code"
            );
            return Err(AuthError::InvalidOrExpiredCode.into());
        }

        let now = self.clock.now();
        let consumed = self
            .code_repository
            .consume(subject_id, purpose, code, now)
            .await?;

        let Some(record) = consumed else {
            tracing::warn!(
                subject_id = %subject_id,
                purpose = %purpose,
                event = "code_rejected",
                reason = "no_match",
                "Verification code did not match any redeemable record"
            );
            return Err(AuthError::InvalidOrExpiredCode.into());
        };

        if purpose == CodePurpose::VerifyAccount {
            tracing::info!(
                subject_id = %subject_id,
                event = "account_verified",
                "Subject account verified"
            );
        }

        tracing::info!(
            subject_id = %subject_id,
            purpose = %purpose,
            code_id = %record.id,
            event = "code_consumed",
            "Verification code consumed"
        );

        Ok(true)
    }

    /// Remove codes that can no longer be redeemed
    ///
    /// # Returns
    ///
    /// Number of codes deleted
    pub async fn purge_expired(&self) -> DomainResult<u64> {
        let removed = self.code_repository.delete_expired(self.clock.now()).await?;
        if removed > 0 {
            tracing::debug!(
                removed = removed,
                event = "codes_purged",
                "Purged expired verification codes"
            );
        }
        Ok(removed)
    }
}
