//! Unit tests for NotificationProcessor

use chrono::{TimeZone, Utc};
use std::sync::Arc;

use crate::domain::entities::{NotificationJob, Subject};
use crate::errors::DomainError;
use crate::services::notification::NotificationProcessor;

use super::mocks::MockMailer;

fn subject() -> Subject {
    Subject::new("Jane", "Doe", "jane@example.com", "hash")
}

#[tokio::test]
async fn test_clock_events_become_attendance_mail() {
    let mailer = Arc::new(MockMailer::new());
    let processor = NotificationProcessor::new(mailer.clone());
    let time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    processor
        .process(&NotificationJob::clock_in(&subject(), time))
        .await
        .unwrap();
    processor
        .process(&NotificationJob::clock_out(&subject(), time))
        .await
        .unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].subject, "Attendance Notification: Clock In");
    assert_eq!(sent[1].subject, "Attendance Notification: Clock Out");
    assert!(sent.iter().all(|m| m.to == "jane@example.com"));
}

#[tokio::test]
async fn test_reset_completed_becomes_confirmation_mail() {
    let mailer = Arc::new(MockMailer::new());
    let processor = NotificationProcessor::new(mailer.clone());

    let id = processor
        .process(&NotificationJob::password_reset_completed(&subject(), Utc::now()))
        .await
        .unwrap();

    assert_eq!(id, "mail-1");
    let message = mailer.last_sent().unwrap();
    assert_eq!(message.subject, "Welcome to Employee Management System");
    assert!(message.body.contains("Jane Doe"));
}

#[tokio::test]
async fn test_delivery_failure_is_reported_to_worker() {
    let processor = NotificationProcessor::new(Arc::new(MockMailer::failing()));

    let result = processor
        .process(&NotificationJob::clock_in(&subject(), Utc::now()))
        .await;

    assert!(matches!(result, Err(DomainError::Internal { .. })));
}
