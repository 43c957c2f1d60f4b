//! Attendance session entity and reporting filters.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

use super::subject::Subject;

/// One clock-in/clock-out interval
///
/// A session without `exit_time` is open. Each subject has at most one open
/// session at any time; the backing store enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSession {
    /// Unique identifier for the session
    pub id: Uuid,

    /// Subject who clocked in
    pub subject_id: Uuid,

    /// Clock-in instant
    pub entry_time: DateTime<Utc>,

    /// Clock-out instant, `None` while the session is open
    pub exit_time: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl AttendanceSession {
    /// Opens a new session for `subject_id` starting at `entry_time`
    pub fn open(subject_id: Uuid, entry_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            entry_time,
            exit_time: None,
            created_at: entry_time,
            updated_at: entry_time,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }

    /// Closes the session at `exit_time`
    pub fn close(&mut self, exit_time: DateTime<Utc>) {
        self.exit_time = Some(exit_time);
        self.updated_at = exit_time;
    }

    /// Worked time for a closed session
    pub fn duration(&self) -> Option<Duration> {
        self.exit_time.map(|exit| exit - self.entry_time)
    }
}

/// Identity of the session owner, denormalized for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Subject> for SubjectSummary {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id,
            email: subject.email.clone(),
            first_name: subject.first_name.clone(),
            last_name: subject.last_name.clone(),
        }
    }
}

/// A session together with its owner, as returned by reporting queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub session: AttendanceSession,
    pub subject: SubjectSummary,
}

/// Criteria for reporting queries over all sessions
///
/// Bounds apply to `entry_time` and are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub subject_id: Option<Uuid>,
    /// Only sessions that have not been closed
    pub open_only: bool,
}

impl SessionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from raw `startDate`/`endDate` query values
    ///
    /// Each value may be a date (`YYYY-MM-DD`, local time) or an RFC 3339
    /// timestamp. A date-only start means the start of that day; a date-only
    /// end means 23:59:59.999 of that day.
    pub fn from_query(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        let from = start
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound(s, "start_date", false))
            .transpose()?;
        let to = end
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound(s, "end_date", true))
            .transpose()?;

        Ok(Self {
            from,
            to,
            ..Self::default()
        })
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn for_subject(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }

    /// Whether a session satisfies every criterion of this filter
    pub fn matches(&self, session: &AttendanceSession) -> bool {
        if let Some(from) = self.from {
            if session.entry_time < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if session.entry_time > to {
                return false;
            }
        }
        if let Some(subject_id) = self.subject_id {
            if session.subject_id != subject_id {
                return false;
            }
        }
        !self.open_only || session.is_open()
    }
}

fn parse_bound(raw: &str, field: &str, end_of_day: bool) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();
    let invalid = || ValidationError::InvalidDate {
        field: field.to_string(),
    };

    // Date-only values carry no time component
    if raw.len() <= 10 {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
        let time = if end_of_day {
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).ok_or_else(invalid)?
        } else {
            NaiveTime::MIN
        };
        return local_to_utc(date.and_time(time), end_of_day).ok_or_else(invalid);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    // Timestamps without an offset are read as local time
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| invalid())?;
    local_to_utc(naive, end_of_day).ok_or_else(invalid)
}

fn local_to_utc(naive: NaiveDateTime, latest: bool) -> Option<DateTime<Utc>> {
    let local = Local.from_local_datetime(&naive);
    let resolved = if latest { local.latest() } else { local.earliest() };
    resolved.map(|dt| dt.with_timezone(&Utc))
}
