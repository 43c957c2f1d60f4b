//! Main attendance service implementation

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::clock::Clock;
use crate::domain::entities::{
    AttendanceRecord, AttendanceSession, NotificationJob, SessionFilter, Subject,
};
use crate::errors::{AttendanceError, DomainError, DomainResult};
use crate::repositories::{AttendanceRepository, SubjectRepository};
use crate::services::notification::{JobQueueTrait, NotificationDispatcher};

/// Opens and closes attendance sessions and serves session history
pub struct AttendanceService<S, A, Q>
where
    S: SubjectRepository,
    A: AttendanceRepository,
    Q: JobQueueTrait + 'static,
{
    subject_repository: Arc<S>,
    attendance_repository: Arc<A>,
    dispatcher: Arc<NotificationDispatcher<Q>>,
    clock: Arc<dyn Clock>,
}

impl<S, A, Q> AttendanceService<S, A, Q>
where
    S: SubjectRepository,
    A: AttendanceRepository,
    Q: JobQueueTrait + 'static,
{
    /// Create a new attendance service
    ///
    /// # Arguments
    ///
    /// * `subject_repository` - Source of the identity used in notices
    /// * `attendance_repository` - Session store enforcing one open session per subject
    /// * `dispatcher` - Notification dispatcher
    /// * `clock` - Time source for entry and exit times
    pub fn new(
        subject_repository: Arc<S>,
        attendance_repository: Arc<A>,
        dispatcher: Arc<NotificationDispatcher<Q>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            subject_repository,
            attendance_repository,
            dispatcher,
            clock,
        }
    }

    /// Clock in: open a new session starting now
    ///
    /// # Returns
    ///
    /// * `Ok(AttendanceSession)` - The new open session
    /// * `Err(AttendanceError::AlreadyClockedIn)` - An open session exists
    /// * `Err(DomainError::NotFound)` - Unknown subject
    pub async fn open_session(&self, subject_id: Uuid) -> DomainResult<AttendanceSession> {
        let subject = self.load_subject(subject_id).await?;

        let entry_time = self.clock.now();
        let session = self
            .attendance_repository
            .create_open_session(AttendanceSession::open(subject_id, entry_time))
            .await
            .map_err(|e| {
                if matches!(e, DomainError::Attendance(AttendanceError::AlreadyClockedIn)) {
                    tracing::info!(
                        subject_id = %subject_id,
                        event = "clock_in_rejected",
                        "Subject is already clocked in"
                    );
                }
                e
            })?;

        tracing::info!(
            subject_id = %subject_id,
            session_id = %session.id,
            entry_time = %session.entry_time,
            event = "clocked_in",
            "Attendance session opened"
        );

        self.dispatcher
            .dispatch(NotificationJob::clock_in(&subject, session.entry_time))
            .await;

        Ok(session)
    }

    /// Clock out: close the subject's open session now
    ///
    /// # Returns
    ///
    /// * `Ok(AttendanceSession)` - The closed session
    /// * `Err(AttendanceError::NotClockedIn)` - No open session exists
    /// * `Err(DomainError::NotFound)` - Unknown subject
    pub async fn close_session(&self, subject_id: Uuid) -> DomainResult<AttendanceSession> {
        let subject = self.load_subject(subject_id).await?;

        let exit_time = self.clock.now();
        let session = self
            .attendance_repository
            .close_open_session(subject_id, exit_time)
            .await?
            .ok_or_else(|| {
                tracing::info!(
                    subject_id = %subject_id,
                    event = "clock_out_rejected",
                    "Subject is not clocked in"
                );
                DomainError::from(AttendanceError::NotClockedIn)
            })?;

        tracing::info!(
            subject_id = %subject_id,
            session_id = %session.id,
            exit_time = %exit_time,
            event = "clocked_out",
            "Attendance session closed"
        );

        self.dispatcher
            .dispatch(NotificationJob::clock_out(&subject, exit_time))
            .await;

        Ok(session)
    }

    /// The subject's sessions, newest first
    pub async fn history(&self, subject_id: Uuid) -> DomainResult<Vec<AttendanceSession>> {
        self.attendance_repository.find_by_subject(subject_id).await
    }

    /// The subject's open session, if any
    pub async fn current_session(
        &self,
        subject_id: Uuid,
    ) -> DomainResult<Option<AttendanceSession>> {
        self.attendance_repository.find_open_session(subject_id).await
    }

    /// Sessions across all subjects for reporting, newest first, each with
    /// its owner's identity
    pub async fn find_all(&self, filter: &SessionFilter) -> DomainResult<Vec<AttendanceRecord>> {
        self.attendance_repository.query(filter).await
    }

    async fn load_subject(&self, subject_id: Uuid) -> DomainResult<Subject> {
        self.subject_repository
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subject"))
    }
}
