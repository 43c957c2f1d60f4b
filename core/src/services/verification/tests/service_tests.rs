//! Unit tests for VerificationService

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use crate::domain::clock::{Clock, ManualClock};
use crate::domain::entities::{CodePurpose, Subject, CODE_LENGTH};
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::repositories::{MockStore, SubjectRepository, VerificationCodeRepository};
use crate::services::verification::{VerificationService, VerificationServiceConfig};

struct Fixture {
    store: Arc<MockStore>,
    clock: Arc<ManualClock>,
    service: VerificationService<MockStore>,
    subject: Subject,
}

async fn fixture() -> Fixture {
    let store = Arc::new(MockStore::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    ));
    let subject = Subject::new("Jane", "Doe", "u1@x.com", "hash");
    store.insert_subject(subject.clone()).await;

    let service = VerificationService::new(
        store.clone(),
        clock.clone(),
        VerificationServiceConfig::default(),
    );

    Fixture {
        store,
        clock,
        service,
        subject,
    }
}

fn is_invalid_code(result: &Result<bool, DomainError>) -> bool {
    matches!(result, Err(DomainError::Auth(AuthError::InvalidOrExpiredCode)))
}

#[tokio::test]
async fn test_issue_returns_six_digit_code() {
    let f = fixture().await;

    let issued = f
        .service
        .issue(f.subject.id, CodePurpose::VerifyAccount, Duration::hours(24))
        .await
        .unwrap();

    assert_eq!(issued.code.len(), CODE_LENGTH);
    assert!(issued.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(issued.expires_at, f.clock.now() + Duration::hours(24));
    assert_eq!(f.store.code_count().await, 1);
}

#[tokio::test]
async fn test_verify_account_code_sets_verified_once() {
    let f = fixture().await;
    let issued = f
        .service
        .issue(f.subject.id, CodePurpose::VerifyAccount, Duration::hours(24))
        .await
        .unwrap();

    f.clock.advance(Duration::hours(1));
    let result = f
        .service
        .validate(f.subject.id, CodePurpose::VerifyAccount, &issued.code)
        .await;
    assert!(matches!(result, Ok(true)));

    let subject = f.store.find_by_id(f.subject.id).await.unwrap().unwrap();
    assert!(subject.is_verified);

    let again = f
        .service
        .validate(f.subject.id, CodePurpose::VerifyAccount, &issued.code)
        .await;
    assert!(is_invalid_code(&again));
}

#[tokio::test]
async fn test_code_valid_before_ttl_and_rejected_after() {
    let f = fixture().await;
    let first = f
        .service
        .issue(f.subject.id, CodePurpose::ResetCredential, Duration::hours(1))
        .await
        .unwrap();
    let second = f
        .service
        .issue(f.subject.id, CodePurpose::ResetCredential, Duration::hours(1))
        .await
        .unwrap();

    f.clock.advance(Duration::minutes(59));
    let result = f
        .service
        .validate(f.subject.id, CodePurpose::ResetCredential, &first.code)
        .await;
    assert!(matches!(result, Ok(true)));

    f.clock.advance(Duration::minutes(1));
    let result = f
        .service
        .validate(f.subject.id, CodePurpose::ResetCredential, &second.code)
        .await;
    assert!(is_invalid_code(&result));
}

#[tokio::test]
async fn test_reset_code_never_verifies_account() {
    let f = fixture().await;
    let issued = f
        .service
        .issue_for(f.subject.id, CodePurpose::ResetCredential)
        .await
        .unwrap();

    let result = f
        .service
        .validate(f.subject.id, CodePurpose::VerifyAccount, &issued.code)
        .await;
    assert!(is_invalid_code(&result));

    let subject = f.store.find_by_id(f.subject.id).await.unwrap().unwrap();
    assert!(!subject.is_verified);

    // The reset code itself is still redeemable for its own purpose
    let result = f
        .service
        .validate(f.subject.id, CodePurpose::ResetCredential, &issued.code)
        .await;
    assert!(matches!(result, Ok(true)));
}

#[tokio::test]
async fn test_wrong_and_malformed_codes_rejected_alike() {
    let f = fixture().await;
    let issued = f
        .service
        .issue_for(f.subject.id, CodePurpose::VerifyAccount)
        .await
        .unwrap();
    let wrong = if issued.code == "000000" { "000001" } else { "000000" };

    for candidate in [wrong, "12345", "abcdef", ""] {
        let result = f
            .service
            .validate(f.subject.id, CodePurpose::VerifyAccount, candidate)
            .await;
        assert!(is_invalid_code(&result), "candidate {:?} should be rejected", candidate);
    }

    // Rejections do not burn the real code
    assert_eq!(f.store.code_count().await, 1);
}

#[tokio::test]
async fn test_concurrent_validation_has_single_winner() {
    let f = fixture().await;
    let issued = f
        .service
        .issue_for(f.subject.id, CodePurpose::ResetCredential)
        .await
        .unwrap();
    let service = Arc::new(f.service);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let code = issued.code.clone();
        let subject_id = f.subject.id;
        handles.push(tokio::spawn(async move {
            service
                .validate(subject_id, CodePurpose::ResetCredential, &code)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_purge_expired() {
    let f = fixture().await;
    f.service
        .issue_for(f.subject.id, CodePurpose::ResetCredential)
        .await
        .unwrap();
    f.service
        .issue_for(f.subject.id, CodePurpose::VerifyAccount)
        .await
        .unwrap();

    f.clock.advance(Duration::hours(2));
    assert_eq!(f.service.purge_expired().await.unwrap(), 1);

    let active = f
        .store
        .find_active(f.subject.id, CodePurpose::VerifyAccount, f.clock.now())
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_internal() {
    let f = fixture().await;
    f.store.set_unavailable(true);

    let result = f
        .service
        .issue_for(f.subject.id, CodePurpose::VerifyAccount)
        .await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));
}

#[tokio::test]
async fn test_failed_flag_write_keeps_code_redeemable() {
    let f = fixture().await;
    let issued = f
        .service
        .issue_for(f.subject.id, CodePurpose::VerifyAccount)
        .await
        .unwrap();

    f.store.set_flag_writes_failing(true);
    let result = f
        .service
        .validate(f.subject.id, CodePurpose::VerifyAccount, &issued.code)
        .await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));
    assert_eq!(f.store.code_count().await, 1);
    let subject = f.store.find_by_id(f.subject.id).await.unwrap().unwrap();
    assert!(!subject.is_verified);

    f.store.set_flag_writes_failing(false);
    let result = f
        .service
        .validate(f.subject.id, CodePurpose::VerifyAccount, &issued.code)
        .await;
    assert!(matches!(result, Ok(true)));
    assert_eq!(f.store.code_count().await, 0);
    let subject = f.store.find_by_id(f.subject.id).await.unwrap().unwrap();
    assert!(subject.is_verified);
}

#[tokio::test]
async fn test_reset_code_unaffected_by_flag_write_failures() {
    let f = fixture().await;
    let issued = f
        .service
        .issue_for(f.subject.id, CodePurpose::ResetCredential)
        .await
        .unwrap();
    f.store.set_flag_writes_failing(true);

    let result = f
        .service
        .validate(f.subject.id, CodePurpose::ResetCredential, &issued.code)
        .await;
    assert!(matches!(result, Ok(true)));
}

#[tokio::test]
async fn test_overflowing_ttl_rejected_without_storing() {
    let f = fixture().await;

    let result = f
        .service
        .issue(f.subject.id, CodePurpose::VerifyAccount, Duration::days(365 * 1_000_000))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::InvalidDate { .. }))
    ));
    assert_eq!(f.store.code_count().await, 0);
}
