//! Bounded-wait job submission

use std::sync::Arc;

use crate::domain::entities::NotificationJob;

use super::config::DispatcherConfig;
use super::traits::JobQueueTrait;
use super::types::DispatchOutcome;

/// Submits notification jobs without ever failing or stalling the caller
///
/// The submission runs as its own task and races a timer. Whichever finishes
/// first decides when control returns. A submission that loses the race is
/// detached, not cancelled: it may still land in the queue later.
pub struct NotificationDispatcher<Q: JobQueueTrait + 'static> {
    queue: Arc<Q>,
    config: DispatcherConfig,
}

impl<Q: JobQueueTrait + 'static> NotificationDispatcher<Q> {
    pub fn new(queue: Arc<Q>, config: DispatcherConfig) -> Self {
        Self { queue, config }
    }

    /// Submit `job`, waiting at most the configured timeout
    ///
    /// Queue errors and timeouts are logged, never returned.
    pub async fn dispatch(&self, job: NotificationJob) -> DispatchOutcome {
        let kind = job.kind();
        let job_id = job.id;
        let queue = Arc::clone(&self.queue);
        let submission = tokio::spawn(async move { queue.submit(&job).await });

        tokio::select! {
            joined = submission => match joined {
                Ok(Ok(ack)) => {
                    tracing::debug!(
                        job_id = %job_id,
                        kind = kind,
                        ack = %ack,
                        event = "notification_submitted",
                        "Notification job submitted"
                    );
                    DispatchOutcome::Submitted(ack)
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        job_id = %job_id,
                        kind = kind,
                        error = %e,
                        event = "notification_submit_failed",
                        "Failed to submit notification job"
                    );
                    DispatchOutcome::Rejected
                }
                Err(e) => {
                    tracing::error!(
                        job_id = %job_id,
                        kind = kind,
                        error = %e,
                        event = "notification_task_failed",
                        "Notification submission task failed"
                    );
                    DispatchOutcome::Rejected
                }
            },
            _ = tokio::time::sleep(self.config.timeout) => {
                // Dropping the JoinHandle detaches the submission
                tracing::warn!(
                    job_id = %job_id,
                    kind = kind,
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    event = "notification_submit_timeout",
                    "Notification queue did not answer in time; continuing without it"
                );
                DispatchOutcome::TimedOut
            }
        }
    }
}
