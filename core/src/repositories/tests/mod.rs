//! Tests for the in-memory store

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::{
    AttendanceSession, CodePurpose, SessionFilter, Subject, VerificationCode,
};
use crate::errors::{AttendanceError, DomainError};
use crate::repositories::{
    AttendanceRepository, MockStore, SubjectRepository, VerificationCodeRepository,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

async fn store_with_subject() -> (MockStore, Subject) {
    let store = MockStore::new();
    let subject = Subject::new("Jane", "Doe", "jane@example.com", "hash");
    store.insert_subject(subject.clone()).await;
    (store, subject)
}

fn code(
    subject_id: Uuid,
    purpose: CodePurpose,
    value: &str,
    issued: DateTime<Utc>,
) -> VerificationCode {
    VerificationCode::new(subject_id, purpose, value.to_string(), issued, purpose.default_ttl())
}

async fn store_code(store: &MockStore, code: VerificationCode) {
    VerificationCodeRepository::create(store, code).await.unwrap();
}

#[tokio::test]
async fn test_find_by_email_is_normalized() {
    let (store, subject) = store_with_subject().await;

    let found = store.find_by_email("  JANE@example.com").await.unwrap();
    assert_eq!(found.map(|s| s.id), Some(subject.id));
    assert!(store.find_by_email("john@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_rejects_duplicate_email() {
    let (store, _) = store_with_subject().await;
    let duplicate = Subject::new("Other", "Person", "jane@example.com", "hash");

    let result = SubjectRepository::create(&store, duplicate).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_second_open_session_rejected() {
    let (store, subject) = store_with_subject().await;

    store
        .create_open_session(AttendanceSession::open(subject.id, t0()))
        .await
        .unwrap();
    let result = store
        .create_open_session(AttendanceSession::open(subject.id, t0() + Duration::minutes(1)))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Attendance(AttendanceError::AlreadyClockedIn))
    ));
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn test_close_open_session() {
    let (store, subject) = store_with_subject().await;
    assert!(store.close_open_session(subject.id, t0()).await.unwrap().is_none());

    store
        .create_open_session(AttendanceSession::open(subject.id, t0()))
        .await
        .unwrap();
    let closed = store
        .close_open_session(subject.id, t0() + Duration::hours(8))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(closed.exit_time, Some(t0() + Duration::hours(8)));
    assert!(store.find_open_session(subject.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_query_orders_newest_first_and_joins_subject() {
    let (store, subject) = store_with_subject().await;
    for day in 0..3 {
        let mut session = AttendanceSession::open(subject.id, t0() + Duration::days(day));
        session.close(t0() + Duration::days(day) + Duration::hours(8));
        store.create_open_session(session).await.unwrap();
    }

    let records = store.query(&SessionFilter::new()).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].session.entry_time, t0() + Duration::days(2));
    assert_eq!(records[2].session.entry_time, t0());
    assert!(records.iter().all(|r| r.subject.email == "jane@example.com"));

    let history = store.find_by_subject(subject.id).await.unwrap();
    assert_eq!(history[0].entry_time, t0() + Duration::days(2));
}

#[tokio::test]
async fn test_consume_picks_newest_and_is_single_use() {
    let (store, subject) = store_with_subject().await;
    let older = code(subject.id, CodePurpose::VerifyAccount, "111111", t0());
    let newer = code(subject.id, CodePurpose::VerifyAccount, "111111", t0() + Duration::minutes(5));
    VerificationCodeRepository::create(&store, older.clone()).await.unwrap();
    VerificationCodeRepository::create(&store, newer.clone()).await.unwrap();

    let now = t0() + Duration::minutes(10);
    let consumed = store
        .consume(subject.id, CodePurpose::VerifyAccount, "111111", now)
        .await
        .unwrap();
    assert_eq!(consumed.map(|c| c.id), Some(newer.id));

    let consumed = store
        .consume(subject.id, CodePurpose::VerifyAccount, "111111", now)
        .await
        .unwrap();
    assert_eq!(consumed.map(|c| c.id), Some(older.id));

    assert!(store
        .consume(subject.id, CodePurpose::VerifyAccount, "111111", now)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_consume_ignores_expired_and_other_purpose() {
    let (store, subject) = store_with_subject().await;
    let reset = code(subject.id, CodePurpose::ResetCredential, "222222", t0());
    VerificationCodeRepository::create(&store, reset).await.unwrap();

    assert!(store
        .consume(subject.id, CodePurpose::VerifyAccount, "222222", t0())
        .await
        .unwrap()
        .is_none());
    assert!(store
        .consume(subject.id, CodePurpose::ResetCredential, "222222", t0() + Duration::hours(1))
        .await
        .unwrap()
        .is_none());
    assert_eq!(store.code_count().await, 1);
}

#[tokio::test]
async fn test_delete_expired_codes() {
    let (store, subject) = store_with_subject().await;
    store_code(&store, code(subject.id, CodePurpose::ResetCredential, "1", t0())).await;
    store_code(&store, code(subject.id, CodePurpose::VerifyAccount, "2", t0())).await;

    let removed = store.delete_expired(t0() + Duration::hours(2)).await.unwrap();
    assert_eq!(removed, 1);
    let active = store
        .find_active(subject.id, CodePurpose::VerifyAccount, t0() + Duration::hours(2))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn test_delete_with_dependents_cascades() {
    let (store, subject) = store_with_subject().await;
    let other = Subject::new("John", "Roe", "john@example.com", "hash");
    store.insert_subject(other.clone()).await;

    store
        .create_open_session(AttendanceSession::open(subject.id, t0()))
        .await
        .unwrap();
    store
        .create_open_session(AttendanceSession::open(other.id, t0()))
        .await
        .unwrap();
    store_code(&store, code(subject.id, CodePurpose::VerifyAccount, "333333", t0())).await;

    let removal = store.delete_with_dependents(subject.id).await.unwrap();
    assert_eq!(removal.sessions_removed, 1);
    assert_eq!(removal.codes_removed, 1);
    assert_eq!(store.session_count().await, 1);
    assert_eq!(store.code_count().await, 0);
    assert!(store.find_by_id(subject.id).await.unwrap().is_none());

    let again = store.delete_with_dependents(subject.id).await;
    assert!(matches!(again, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_unavailable_store_fails_internally() {
    let (store, subject) = store_with_subject().await;
    store.set_unavailable(true);

    let result = store.find_by_id(subject.id).await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));

    store.set_unavailable(false);
    assert!(store.find_by_id(subject.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_consume_verify_account_sets_flag_in_same_step() {
    let (store, subject) = store_with_subject().await;
    store_code(&store, code(subject.id, CodePurpose::VerifyAccount, "444444", t0())).await;

    store.set_flag_writes_failing(true);
    let failed = store
        .consume(subject.id, CodePurpose::VerifyAccount, "444444", t0())
        .await;
    assert!(matches!(failed, Err(DomainError::Internal { .. })));
    assert_eq!(store.code_count().await, 1);

    store.set_flag_writes_failing(false);
    let consumed = store
        .consume(subject.id, CodePurpose::VerifyAccount, "444444", t0())
        .await
        .unwrap();
    assert!(consumed.is_some());
    assert!(store.find_by_id(subject.id).await.unwrap().unwrap().is_verified);
}
