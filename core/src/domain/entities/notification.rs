//! Notification jobs handed to the external queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subject::Subject;

/// Data for clock-in and clock-out notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceNotice {
    pub subject_id: Uuid,
    pub email: String,
    pub name: String,
    pub time: DateTime<Utc>,
}

/// Data for account notices such as the post-reset confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNotice {
    pub subject_id: Uuid,
    pub email: String,
    pub name: String,
}

/// Job kind and its structured data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum JobPayload {
    ClockIn(AttendanceNotice),
    ClockOut(AttendanceNotice),
    PasswordResetCompleted(AccountNotice),
}

/// Transient handoff to the notification queue; never persisted by this crate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub payload: JobPayload,
}

impl NotificationJob {
    pub fn new(payload: JobPayload, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            payload,
        }
    }

    pub fn clock_in(subject: &Subject, time: DateTime<Utc>) -> Self {
        Self::new(JobPayload::ClockIn(attendance_notice(subject, time)), time)
    }

    pub fn clock_out(subject: &Subject, time: DateTime<Utc>) -> Self {
        Self::new(JobPayload::ClockOut(attendance_notice(subject, time)), time)
    }

    pub fn password_reset_completed(subject: &Subject, created_at: DateTime<Utc>) -> Self {
        Self::new(
            JobPayload::PasswordResetCompleted(AccountNotice {
                subject_id: subject.id,
                email: subject.email.clone(),
                name: subject.display_name(),
            }),
            created_at,
        )
    }

    /// Queue-facing job name
    pub fn kind(&self) -> &'static str {
        match self.payload {
            JobPayload::ClockIn(_) => "clock-in",
            JobPayload::ClockOut(_) => "clock-out",
            JobPayload::PasswordResetCompleted(_) => "password-reset-completed",
        }
    }

    /// Recipient address of the resulting notice
    pub fn recipient(&self) -> &str {
        match &self.payload {
            JobPayload::ClockIn(n) | JobPayload::ClockOut(n) => &n.email,
            JobPayload::PasswordResetCompleted(n) => &n.email,
        }
    }
}

fn attendance_notice(subject: &Subject, time: DateTime<Utc>) -> AttendanceNotice {
    AttendanceNotice {
        subject_id: subject.id,
        email: subject.email.clone(),
        name: subject.display_name(),
        time,
    }
}
