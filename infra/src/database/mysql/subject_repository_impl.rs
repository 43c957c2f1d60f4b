//! MySQL implementation of the SubjectRepository trait.
//!
//! Subjects live in `users`; role grants live in `user_roles` and are read
//! back with a grouped join.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;
use uuid::Uuid;

use wf_core::domain::entities::Subject;
use wf_core::domain::value_objects::SubjectRemoval;
use wf_core::errors::DomainError;
use wf_core::repositories::SubjectRepository;

use super::rows::{is_unique_violation, query_error, row_to_subject, SUBJECT_COLUMNS};

/// MySQL implementation of SubjectRepository
pub struct MySqlSubjectRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSubjectRepository {
    /// Create a new MySQL subject repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, clause: &str, value: String) -> Result<Option<Subject>, DomainError> {
        let query = format!(
            r#"
            SELECT {SUBJECT_COLUMNS}
            FROM users u
            LEFT JOIN user_roles ur ON ur.user_id = u.id
            LEFT JOIN roles r ON r.id = ur.role_id
            WHERE {clause}
            GROUP BY u.id
            "#
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to load subject"))?;

        row.as_ref().map(row_to_subject).transpose()
    }
}

#[async_trait]
impl SubjectRepository for MySqlSubjectRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subject>, DomainError> {
        self.find_one("u.id = ?", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subject>, DomainError> {
        self.find_one(
            "u.email = ?",
            wf_shared::utils::email::normalize_email(email),
        )
        .await
    }

    async fn create(&self, subject: Subject) -> Result<Subject, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(query_error("Failed to begin transaction"))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, email, phone_number, employee_identifier,
                password_hash, is_verified, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(subject.id.to_string())
        .bind(&subject.first_name)
        .bind(&subject.last_name)
        .bind(&subject.email)
        .bind(&subject.phone_number)
        .bind(&subject.employee_identifier)
        .bind(&subject.password_hash)
        .bind(subject.is_verified)
        .bind(subject.created_at)
        .bind(subject.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            if is_unique_violation(&e) {
                return Err(DomainError::Validation {
                    message: "Email already registered".to_string(),
                });
            }
            return Err(query_error("Failed to create subject")(e));
        }

        for role in &subject.roles {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) SELECT ?, id FROM roles WHERE name = ?",
            )
                .bind(subject.id.to_string())
                .bind(role.as_str())
                .execute(&mut *tx)
                .await
                .map_err(query_error("Failed to grant role"))?;
        }

        tx.commit()
            .await
            .map_err(query_error("Failed to commit subject"))?;

        Ok(subject)
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET is_verified = TRUE, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(query_error("Failed to mark subject verified"))?;

        // MySQL reports zero affected rows for an unchanged row, so only a
        // missing subject is an error
        if result.rows_affected() == 0 && self.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Subject"));
        }
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(query_error("Failed to update password hash"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Subject"));
        }
        Ok(())
    }

    async fn delete_with_dependents(&self, id: Uuid) -> Result<SubjectRemoval, DomainError> {
        let id_str = id.to_string();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(query_error("Failed to begin transaction"))?;

        let exists = sqlx::query("SELECT id FROM users WHERE id = ? FOR UPDATE")
            .bind(&id_str)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error("Failed to lock subject"))?;
        if exists.is_none() {
            return Err(DomainError::not_found("Subject"));
        }

        let sessions_removed = sqlx::query("DELETE FROM attendances WHERE subject_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(query_error("Failed to delete sessions"))?
            .rows_affected();

        let codes_removed = sqlx::query("DELETE FROM verifications WHERE subject_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(query_error("Failed to delete verification codes"))?
            .rows_affected();

        sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(query_error("Failed to delete role grants"))?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(query_error("Failed to delete subject"))?;

        tx.commit()
            .await
            .map_err(query_error("Failed to commit subject removal"))?;

        tracing::info!(
            subject_id = %id,
            sessions_removed,
            codes_removed,
            event = "subject_removed",
            "Subject removed with dependents"
        );

        Ok(SubjectRemoval {
            subject_id: id,
            sessions_removed,
            codes_removed,
        })
    }
}
