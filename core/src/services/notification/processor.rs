//! Queue consumer side: turns notification jobs into mail

use std::sync::Arc;

use wf_shared::utils::email::mask_email;

use crate::domain::entities::{JobPayload, NotificationJob};
use crate::errors::{DomainError, DomainResult};

use super::messages::MailMessage;
use super::traits::MailerTrait;

/// Delivers the mail that each notification job stands for
pub struct NotificationProcessor<M: MailerTrait> {
    mailer: Arc<M>,
}

impl<M: MailerTrait> NotificationProcessor<M> {
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }

    /// Compose the mail for `job`
    pub fn compose(job: &NotificationJob) -> MailMessage {
        match &job.payload {
            JobPayload::ClockIn(n) => {
                MailMessage::attendance(&n.email, &n.name, "Clock In", n.time)
            }
            JobPayload::ClockOut(n) => {
                MailMessage::attendance(&n.email, &n.name, "Clock Out", n.time)
            }
            JobPayload::PasswordResetCompleted(n) => {
                MailMessage::password_reset_completed(&n.email, &n.name)
            }
        }
    }

    /// Deliver the mail for `job`
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider message id
    /// * `Err(DomainError::Internal)` - Delivery failed; the worker decides
    ///   whether to retry
    pub async fn process(&self, job: &NotificationJob) -> DomainResult<String> {
        let message = Self::compose(job);

        match self.mailer.send(&message).await {
            Ok(message_id) => {
                tracing::info!(
                    job_id = %job.id,
                    kind = job.kind(),
                    to = %mask_email(&message.to),
                    message_id = %message_id,
                    event = "notification_delivered",
                    "Delivered notification mail"
                );
                Ok(message_id)
            }
            Err(e) => {
                tracing::error!(
                    job_id = %job.id,
                    kind = job.kind(),
                    to = %mask_email(&message.to),
                    error = %e,
                    event = "notification_delivery_failed",
                    "Failed to deliver notification mail"
                );
                Err(DomainError::Internal {
                    message: format!("Failed to deliver {} notification: {}", job.kind(), e),
                })
            }
        }
    }
}
