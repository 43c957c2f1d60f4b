//! In-memory store implementing every repository trait
//!
//! Subjects, sessions and codes share one lock so that joins and cascades
//! see a consistent snapshot, the way a single database would.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{
    AttendanceRecord, AttendanceSession, CodePurpose, SessionFilter, Subject, SubjectSummary,
    VerificationCode,
};
use crate::domain::value_objects::SubjectRemoval;
use crate::errors::{AttendanceError, DomainError};

use super::{AttendanceRepository, SubjectRepository, VerificationCodeRepository};

#[derive(Default)]
struct StoreState {
    subjects: HashMap<Uuid, Subject>,
    sessions: HashMap<Uuid, AttendanceSession>,
    codes: Vec<VerificationCode>,
}

/// Mock store for testing
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<RwLock<StoreState>>,
    unavailable: Arc<AtomicBool>,
    flag_writes_fail: Arc<AtomicBool>,
}

impl MockStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a subject directly, bypassing duplicate checks
    pub async fn insert_subject(&self, subject: Subject) {
        self.state.write().await.subjects.insert(subject.id, subject);
    }

    /// Simulate an unreachable store: every call fails with `DomainError::Internal`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make every write of a subject's verified flag fail with
    /// `DomainError::Internal` while reads keep working
    pub fn set_flag_writes_failing(&self, failing: bool) {
        self.flag_writes_fail.store(failing, Ordering::SeqCst);
    }

    /// Total number of stored codes, expired ones included
    pub async fn code_count(&self) -> usize {
        self.state.read().await.codes.len()
    }

    /// Total number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::internal("store unavailable"));
        }
        Ok(())
    }

    fn check_flag_writable(&self) -> Result<(), DomainError> {
        if self.flag_writes_fail.load(Ordering::SeqCst) {
            return Err(DomainError::internal("verified flag write failed"));
        }
        Ok(())
    }
}

fn newest_first(sessions: &mut [AttendanceSession]) {
    sessions.sort_by(|a, b| b.entry_time.cmp(&a.entry_time));
}

#[async_trait]
impl SubjectRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subject>, DomainError> {
        self.check_available()?;
        Ok(self.state.read().await.subjects.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subject>, DomainError> {
        self.check_available()?;
        let email = wf_shared::utils::email::normalize_email(email);
        let state = self.state.read().await;
        Ok(state.subjects.values().find(|s| s.email == email).cloned())
    }

    async fn create(&self, subject: Subject) -> Result<Subject, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.subjects.values().any(|s| s.email == subject.email) {
            return Err(DomainError::Validation {
                message: "Email already registered".to_string(),
            });
        }
        state.subjects.insert(subject.id, subject.clone());
        Ok(subject)
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), DomainError> {
        self.check_available()?;
        self.check_flag_writable()?;
        let mut state = self.state.write().await;
        let subject = state
            .subjects
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Subject"))?;
        subject.verify();
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let subject = state
            .subjects
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Subject"))?;
        subject.set_password_hash(password_hash.to_string());
        Ok(())
    }

    async fn delete_with_dependents(&self, id: Uuid) -> Result<SubjectRemoval, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.subjects.remove(&id).is_none() {
            return Err(DomainError::not_found("Subject"));
        }

        let sessions_before = state.sessions.len();
        state.sessions.retain(|_, s| s.subject_id != id);
        let codes_before = state.codes.len();
        state.codes.retain(|c| c.subject_id != id);

        Ok(SubjectRemoval {
            subject_id: id,
            sessions_removed: (sessions_before - state.sessions.len()) as u64,
            codes_removed: (codes_before - state.codes.len()) as u64,
        })
    }
}

#[async_trait]
impl AttendanceRepository for MockStore {
    async fn create_open_session(
        &self,
        session: AttendanceSession,
    ) -> Result<AttendanceSession, DomainError> {
        self.check_available()?;
        // Check and insert under one write lock
        let mut state = self.state.write().await;
        if state
            .sessions
            .values()
            .any(|s| s.subject_id == session.subject_id && s.is_open())
        {
            return Err(AttendanceError::AlreadyClockedIn.into());
        }
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn close_open_session(
        &self,
        subject_id: Uuid,
        exit_time: DateTime<Utc>,
    ) -> Result<Option<AttendanceSession>, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let open = state
            .sessions
            .values_mut()
            .find(|s| s.subject_id == subject_id && s.is_open());

        Ok(open.map(|session| {
            session.close(exit_time);
            session.clone()
        }))
    }

    async fn find_open_session(
        &self,
        subject_id: Uuid,
    ) -> Result<Option<AttendanceSession>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .sessions
            .values()
            .find(|s| s.subject_id == subject_id && s.is_open())
            .cloned())
    }

    async fn find_by_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<AttendanceSession>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut sessions: Vec<AttendanceSession> = state
            .sessions
            .values()
            .filter(|s| s.subject_id == subject_id)
            .cloned()
            .collect();
        newest_first(&mut sessions);
        Ok(sessions)
    }

    async fn query(&self, filter: &SessionFilter) -> Result<Vec<AttendanceRecord>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut sessions: Vec<AttendanceSession> = state
            .sessions
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        newest_first(&mut sessions);

        // Inner join: sessions whose owner is gone are not reported
        Ok(sessions
            .into_iter()
            .filter_map(|session| {
                let subject = state.subjects.get(&session.subject_id)?;
                Some(AttendanceRecord {
                    subject: SubjectSummary::from(subject),
                    session,
                })
            })
            .collect())
    }
}

#[async_trait]
impl VerificationCodeRepository for MockStore {
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError> {
        self.check_available()?;
        self.state.write().await.codes.push(code.clone());
        Ok(code)
    }

    async fn consume(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let newest = state
            .codes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.matches(subject_id, purpose, code) && !c.is_expired_at(now))
            .max_by_key(|(_, c)| c.created_at)
            .map(|(index, _)| index);

        let Some(index) = newest else {
            return Ok(None);
        };

        // Flag first: a failed write must leave the code redeemable
        if purpose == CodePurpose::VerifyAccount {
            self.check_flag_writable()?;
            state
                .subjects
                .get_mut(&subject_id)
                .ok_or_else(|| DomainError::not_found("Subject"))?
                .verify();
        }

        Ok(Some(state.codes.remove(index)))
    }

    async fn find_active(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        now: DateTime<Utc>,
    ) -> Result<Vec<VerificationCode>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut codes: Vec<VerificationCode> = state
            .codes
            .iter()
            .filter(|c| c.subject_id == subject_id && c.purpose == purpose && !c.is_expired_at(now))
            .cloned()
            .collect();
        codes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(codes)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let before = state.codes.len();
        state.codes.retain(|c| !c.is_expired_at(now));
        Ok((before - state.codes.len()) as u64)
    }
}
