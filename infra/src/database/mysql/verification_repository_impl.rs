//! MySQL implementation of the VerificationCodeRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use wf_core::domain::entities::{CodePurpose, VerificationCode};
use wf_core::errors::DomainError;
use wf_core::repositories::VerificationCodeRepository;

use super::rows::{query_error, row_to_code, CODE_COLUMNS};

/// MySQL implementation of VerificationCodeRepository
pub struct MySqlVerificationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationRepository {
    /// Create a new MySQL verification code repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationCodeRepository for MySqlVerificationRepository {
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO verifications (id, subject_id, purpose, code, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(code.id.to_string())
        .bind(code.subject_id.to_string())
        .bind(code.purpose.as_str())
        .bind(&code.code)
        .bind(code.created_at)
        .bind(code.expires_at)
        .execute(&self.pool)
        .await
        .map_err(query_error("Failed to store verification code"))?;

        Ok(code)
    }

    /// Locks the subject's live codes for `purpose`, compares in constant
    /// time and deletes the newest match inside the same transaction. A
    /// concurrent consumer blocks on the row locks and then finds it gone.
    /// An account verification code flips `users.is_verified` before the
    /// commit, so the delete and the flag land together or not at all.
    async fn consume(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(query_error("Failed to begin transaction"))?;

        let query = format!(
            r#"
            SELECT {CODE_COLUMNS}
            FROM verifications
            WHERE subject_id = ? AND purpose = ? AND expires_at > ?
            ORDER BY created_at DESC
            FOR UPDATE
            "#
        );
        let rows = sqlx::query(&query)
            .bind(subject_id.to_string())
            .bind(purpose.as_str())
            .bind(now)
            .fetch_all(&mut *tx)
            .await
            .map_err(query_error("Failed to lock verification codes"))?;

        let mut matched = None;
        for row in &rows {
            let candidate = row_to_code(row)?;
            if candidate.matches(subject_id, purpose, code) {
                matched = Some(candidate);
                break;
            }
        }

        let Some(consumed) = matched else {
            return Ok(None);
        };

        let deleted = sqlx::query("DELETE FROM verifications WHERE id = ?")
            .bind(consumed.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error("Failed to consume verification code"))?;

        if purpose == CodePurpose::VerifyAccount {
            // Dropping `tx` on error rolls the delete back
            sqlx::query("UPDATE users SET is_verified = TRUE, updated_at = ? WHERE id = ?")
                .bind(now)
                .bind(subject_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(query_error("Failed to mark subject verified"))?;
        }

        tx.commit()
            .await
            .map_err(query_error("Failed to commit code consumption"))?;

        Ok((deleted.rows_affected() == 1).then_some(consumed))
    }

    async fn find_active(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        now: DateTime<Utc>,
    ) -> Result<Vec<VerificationCode>, DomainError> {
        let query = format!(
            r#"
            SELECT {CODE_COLUMNS}
            FROM verifications
            WHERE subject_id = ? AND purpose = ? AND expires_at > ?
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query(&query)
            .bind(subject_id.to_string())
            .bind(purpose.as_str())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("Failed to find verification codes"))?;

        rows.iter().map(row_to_code).collect()
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM verifications WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(query_error("Failed to purge expired codes"))?;

        Ok(result.rows_affected())
    }
}
