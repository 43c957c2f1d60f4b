//! MySQL implementation of the AttendanceRepository trait.
//!
//! The one-open-session rule is enforced by the unique index on the
//! generated `open_subject_id` column, so concurrent opens race inside
//! MySQL and exactly one insert wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use wf_core::domain::entities::{AttendanceRecord, AttendanceSession, SessionFilter};
use wf_core::errors::{AttendanceError, DomainError};
use wf_core::repositories::AttendanceRepository;

use super::rows::{is_unique_violation, query_error, row_to_record, row_to_session, SESSION_COLUMNS};

/// MySQL implementation of AttendanceRepository
pub struct MySqlAttendanceRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAttendanceRepository {
    /// Create a new MySQL attendance repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for MySqlAttendanceRepository {
    async fn create_open_session(
        &self,
        session: AttendanceSession,
    ) -> Result<AttendanceSession, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendances (id, subject_id, entry_time, exit_time, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.id.to_string())
        .bind(session.subject_id.to_string())
        .bind(session.entry_time)
        .bind(session.exit_time)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(session),
            Err(e) if is_unique_violation(&e) => Err(AttendanceError::AlreadyClockedIn.into()),
            Err(e) => Err(query_error("Failed to create session")(e)),
        }
    }

    async fn close_open_session(
        &self,
        subject_id: Uuid,
        exit_time: DateTime<Utc>,
    ) -> Result<Option<AttendanceSession>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(query_error("Failed to begin transaction"))?;

        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM attendances a WHERE a.open_subject_id = ? FOR UPDATE"
        );
        let row = sqlx::query(&query)
            .bind(subject_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error("Failed to lock open session"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut session = row_to_session(&row)?;
        session.close(exit_time);

        sqlx::query("UPDATE attendances SET exit_time = ?, updated_at = ? WHERE id = ?")
            .bind(session.exit_time)
            .bind(session.updated_at)
            .bind(session.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error("Failed to close session"))?;

        tx.commit()
            .await
            .map_err(query_error("Failed to commit session close"))?;

        Ok(Some(session))
    }

    async fn find_open_session(
        &self,
        subject_id: Uuid,
    ) -> Result<Option<AttendanceSession>, DomainError> {
        let query =
            format!("SELECT {SESSION_COLUMNS} FROM attendances a WHERE a.open_subject_id = ?");
        let row = sqlx::query(&query)
            .bind(subject_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to find open session"))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn find_by_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<AttendanceSession>, DomainError> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM attendances a \
             WHERE a.subject_id = ? ORDER BY a.entry_time DESC"
        );
        let rows = sqlx::query(&query)
            .bind(subject_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("Failed to find subject sessions"))?;

        rows.iter().map(row_to_session).collect()
    }

    async fn query(&self, filter: &SessionFilter) -> Result<Vec<AttendanceRecord>, DomainError> {
        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            r#"
            SELECT {SESSION_COLUMNS},
                   u.email AS subject_email,
                   u.first_name AS subject_first_name,
                   u.last_name AS subject_last_name
            FROM attendances a
            INNER JOIN users u ON u.id = a.subject_id
            WHERE 1 = 1
            "#
        ));

        if let Some(from) = filter.from {
            builder.push(" AND a.entry_time >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            builder.push(" AND a.entry_time <= ").push_bind(to);
        }
        if let Some(subject_id) = filter.subject_id {
            builder.push(" AND a.subject_id = ").push_bind(subject_id.to_string());
        }
        if filter.open_only {
            builder.push(" AND a.exit_time IS NULL");
        }
        builder.push(" ORDER BY a.entry_time DESC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("Failed to query sessions"))?;

        rows.iter().map(row_to_record).collect()
    }
}
