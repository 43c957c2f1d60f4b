//! Mock Mail Service Implementation
//!
//! Logs messages instead of delivering them and keeps a copy for tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use wf_shared::utils::email::{is_valid_email, mask_email};

use super::mail_service::MailService;
use crate::InfrastructureError;

/// A message captured by the mock service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mock mail service for development and testing
#[derive(Clone, Default)]
pub struct MockMailService {
    sent: Arc<Mutex<Vec<SentMail>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockMailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service whose every send fails
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn message_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }
}

#[async_trait]
impl MailService for MockMailService {
    async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        if !is_valid_email(to) {
            return Err(InfrastructureError::Mail(format!(
                "Invalid recipient address: {}",
                mask_email(to)
            )));
        }

        if self.simulate_failure {
            warn!(to = %mask_email(to), "Mock mail service simulating failure");
            return Err(InfrastructureError::Mail("Simulated mail failure".to_string()));
        }

        let message_id = format!("mock-{}", Uuid::new_v4());
        info!(
            to = %mask_email(to),
            subject = %subject,
            message_id = %message_id,
            "[MOCK MAIL] message accepted"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        }

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
