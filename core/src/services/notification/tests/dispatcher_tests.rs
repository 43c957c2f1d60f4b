//! Unit tests for NotificationDispatcher

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{NotificationJob, Subject};
use crate::services::notification::{DispatchOutcome, DispatcherConfig, NotificationDispatcher};

use super::mocks::{MockJobQueue, QueueBehavior};

fn job() -> NotificationJob {
    let subject = Subject::new("Jane", "Doe", "jane@example.com", "hash");
    NotificationJob::clock_in(&subject, Utc::now())
}

fn dispatcher(queue: &Arc<MockJobQueue>) -> NotificationDispatcher<MockJobQueue> {
    NotificationDispatcher::new(queue.clone(), DispatcherConfig::default())
}

#[tokio::test]
async fn test_dispatch_submits_job() {
    let queue = Arc::new(MockJobQueue::accepting());
    let job = job();

    let outcome = dispatcher(&queue).dispatch(job.clone()).await;

    assert_eq!(outcome, DispatchOutcome::Submitted("ack-1".to_string()));
    assert_eq!(queue.accepted(), vec![job]);
}

#[tokio::test]
async fn test_dispatch_contains_queue_errors() {
    let queue = Arc::new(MockJobQueue::new(QueueBehavior::Fail));

    let outcome = dispatcher(&queue).dispatch(job()).await;

    assert_eq!(outcome, DispatchOutcome::Rejected);
    assert_eq!(queue.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_returns_at_timeout_when_queue_hangs() {
    let queue = Arc::new(MockJobQueue::new(QueueBehavior::Hang));
    let started = tokio::time::Instant::now();

    let outcome = dispatcher(&queue).dispatch(job()).await;

    assert_eq!(outcome, DispatchOutcome::TimedOut);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(2000));
    assert!(elapsed < Duration::from_millis(2010));
}

#[tokio::test(start_paused = true)]
async fn test_slow_queue_within_bound_is_awaited() {
    let queue = Arc::new(MockJobQueue::new(QueueBehavior::Delay(Duration::from_millis(500))));
    let started = tokio::time::Instant::now();

    let outcome = dispatcher(&queue).dispatch(job()).await;

    assert!(outcome.is_submitted());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed < Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_submission_keeps_running_detached() {
    let queue = Arc::new(MockJobQueue::new(QueueBehavior::Delay(Duration::from_secs(5))));

    let outcome = dispatcher(&queue).dispatch(job()).await;
    assert_eq!(outcome, DispatchOutcome::TimedOut);
    assert!(queue.accepted().is_empty());

    // The abandoned submission still completes on its own
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(queue.accepted().len(), 1);
}

#[tokio::test]
async fn test_custom_timeout_with_real_time() {
    let queue = Arc::new(MockJobQueue::new(QueueBehavior::Hang));
    let dispatcher = NotificationDispatcher::new(
        queue.clone(),
        DispatcherConfig {
            timeout: Duration::from_millis(50),
        },
    );
    let started = std::time::Instant::now();

    let outcome = dispatcher.dispatch(job()).await;

    assert_eq!(outcome, DispatchOutcome::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(1));
}
