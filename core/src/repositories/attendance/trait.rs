//! Attendance session repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{AttendanceRecord, AttendanceSession, SessionFilter};
use crate::errors::DomainError;

/// Repository trait for AttendanceSession persistence operations
///
/// The store is the single point of truth for the "one open session per
/// subject" invariant. Both mutating operations must be atomic with respect
/// to concurrent callers, including callers in other processes.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert a new open session
    ///
    /// The check for an existing open session and the insert happen as one
    /// atomic step (a uniqueness constraint in SQL stores).
    ///
    /// # Errors
    /// * `DomainError::Attendance(AttendanceError::AlreadyClockedIn)` - The
    ///   subject already has an open session
    async fn create_open_session(
        &self,
        session: AttendanceSession,
    ) -> Result<AttendanceSession, DomainError>;

    /// Close the subject's open session at `exit_time`
    ///
    /// # Returns
    /// * `Ok(Some(session))` - The session that was closed, with `exit_time` set
    /// * `Ok(None)` - The subject had no open session
    async fn close_open_session(
        &self,
        subject_id: Uuid,
        exit_time: DateTime<Utc>,
    ) -> Result<Option<AttendanceSession>, DomainError>;

    /// Find the subject's open session, if any
    async fn find_open_session(
        &self,
        subject_id: Uuid,
    ) -> Result<Option<AttendanceSession>, DomainError>;

    /// All sessions of one subject, newest `entry_time` first
    async fn find_by_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<AttendanceSession>, DomainError>;

    /// Sessions matching `filter` joined with their owners, newest `entry_time` first
    async fn query(&self, filter: &SessionFilter) -> Result<Vec<AttendanceRecord>, DomainError>;
}
