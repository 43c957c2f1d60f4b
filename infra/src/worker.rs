//! Notification worker
//!
//! Pulls jobs from a [`JobSource`] and hands each one to the core
//! [`NotificationProcessor`]. Delivery failures are logged and the job is
//! dropped; the worker itself only stops on the shutdown signal.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use wf_core::domain::entities::NotificationJob;
use wf_core::services::notification::{MailerTrait, NotificationProcessor};

use crate::InfrastructureError;

/// Pause after a failed poll before asking the source again
const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Somewhere notification jobs can be taken from
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Wait up to `wait` for the next job; `Ok(None)` when none arrived
    async fn next_job(
        &self,
        wait: Duration,
    ) -> Result<Option<NotificationJob>, InfrastructureError>;
}

/// Counters reported when the worker stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Jobs whose mail was delivered
    pub delivered: u64,
    /// Jobs whose delivery failed
    pub failed: u64,
    /// Polls that failed at the source
    pub source_errors: u64,
}

/// Queue consumer turning notification jobs into mail
pub struct NotificationWorker<S: JobSource, M: MailerTrait> {
    source: Arc<S>,
    processor: NotificationProcessor<M>,
    poll_timeout: Duration,
    error_backoff: Duration,
}

impl<S: JobSource, M: MailerTrait> NotificationWorker<S, M> {
    pub fn new(source: Arc<S>, mailer: Arc<M>, poll_timeout: Duration) -> Self {
        Self {
            source,
            processor: NotificationProcessor::new(mailer),
            poll_timeout,
            error_backoff: DEFAULT_ERROR_BACKOFF,
        }
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Run until `shutdown` turns true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> WorkerStats {
        let mut stats = WorkerStats::default();
        tracing::info!(event = "worker_started", "Notification worker started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let next = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                next = self.source.next_job(self.poll_timeout) => next,
            };

            match next {
                Ok(Some(job)) => match self.processor.process(&job).await {
                    Ok(_) => stats.delivered += 1,
                    // Already logged by the processor
                    Err(_) => stats.failed += 1,
                },
                Ok(None) => {}
                Err(e) => {
                    stats.source_errors += 1;
                    tracing::warn!(
                        error = %e,
                        backoff_ms = self.error_backoff.as_millis() as u64,
                        event = "worker_poll_failed",
                        "Failed to poll notification queue"
                    );
                    tokio::select! {
                        changed = shutdown.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        _ = tokio::time::sleep(self.error_backoff) => {}
                    }
                }
            }
        }

        tracing::info!(
            delivered = stats.delivered,
            failed = stats.failed,
            source_errors = stats.source_errors,
            event = "worker_stopped",
            "Notification worker stopped"
        );
        stats
    }
}
