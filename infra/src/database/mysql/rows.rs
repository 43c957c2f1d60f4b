//! Row mapping shared by the MySQL repositories

use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Row};
use uuid::Uuid;

use wf_core::domain::entities::{
    AttendanceRecord, AttendanceSession, CodePurpose, Role, Subject, SubjectSummary,
    VerificationCode,
};
use wf_core::errors::DomainError;

/// Column list for subject queries; expects `users u` joined to roles
pub(super) const SUBJECT_COLUMNS: &str = r#"
    u.id, u.first_name, u.last_name, u.email, u.phone_number, u.employee_identifier,
    u.password_hash, u.is_verified, u.created_at, u.updated_at,
    CAST(GROUP_CONCAT(r.name ORDER BY r.name) AS CHAR) AS roles
"#;

pub(super) const SESSION_COLUMNS: &str =
    "a.id, a.subject_id, a.entry_time, a.exit_time, a.created_at, a.updated_at";

pub(super) const CODE_COLUMNS: &str = "id, subject_id, purpose, code, created_at, expires_at";

/// Maps a driver error into the fatal channel with some context
pub(super) fn query_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn get<'r, T>(row: &'r MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(column).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    })
}

fn get_uuid(row: &MySqlRow, column: &str) -> Result<Uuid, DomainError> {
    let raw: String = get(row, column)?;
    Uuid::parse_str(&raw).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", column, e),
    })
}

pub(super) fn row_to_subject(row: &MySqlRow) -> Result<Subject, DomainError> {
    let roles: Option<String> = get(row, "roles")?;
    let roles = roles
        .unwrap_or_default()
        .split(',')
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Role>()
                .map_err(|message| DomainError::Internal { message })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Subject {
        id: get_uuid(row, "id")?,
        first_name: get(row, "first_name")?,
        last_name: get(row, "last_name")?,
        email: get(row, "email")?,
        phone_number: get(row, "phone_number")?,
        employee_identifier: get(row, "employee_identifier")?,
        password_hash: get(row, "password_hash")?,
        is_verified: get(row, "is_verified")?,
        roles,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
    })
}

pub(super) fn row_to_session(row: &MySqlRow) -> Result<AttendanceSession, DomainError> {
    Ok(AttendanceSession {
        id: get_uuid(row, "id")?,
        subject_id: get_uuid(row, "subject_id")?,
        entry_time: get::<DateTime<Utc>>(row, "entry_time")?,
        exit_time: get::<Option<DateTime<Utc>>>(row, "exit_time")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
    })
}

/// Session columns plus `subject_email`, `subject_first_name`, `subject_last_name`
pub(super) fn row_to_record(row: &MySqlRow) -> Result<AttendanceRecord, DomainError> {
    let session = row_to_session(row)?;
    let subject = SubjectSummary {
        id: session.subject_id,
        email: get(row, "subject_email")?,
        first_name: get(row, "subject_first_name")?,
        last_name: get(row, "subject_last_name")?,
    };
    Ok(AttendanceRecord { session, subject })
}

pub(super) fn row_to_code(row: &MySqlRow) -> Result<VerificationCode, DomainError> {
    let purpose: String = get(row, "purpose")?;
    Ok(VerificationCode {
        id: get_uuid(row, "id")?,
        subject_id: get_uuid(row, "subject_id")?,
        purpose: purpose
            .parse::<CodePurpose>()
            .map_err(|message| DomainError::Internal { message })?,
        code: get(row, "code")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        expires_at: get::<DateTime<Utc>>(row, "expires_at")?,
    })
}
