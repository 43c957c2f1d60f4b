//! Traits for queue and mail integration

use async_trait::async_trait;

use crate::domain::entities::NotificationJob;

use super::messages::MailMessage;

/// Trait for the external job queue
#[async_trait]
pub trait JobQueueTrait: Send + Sync {
    /// Submit a job; returns a queue acknowledgement id
    async fn submit(&self, job: &NotificationJob) -> Result<String, String>;
}

/// Trait for outbound mail delivery
#[async_trait]
pub trait MailerTrait: Send + Sync {
    /// Deliver a message; returns the provider message id
    async fn send(&self, message: &MailMessage) -> Result<String, String>;
}
