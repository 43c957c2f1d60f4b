//! Adapter from infrastructure mail services to the core `MailerTrait`

use async_trait::async_trait;

use wf_core::services::notification::{MailMessage, MailerTrait};

use super::mail_service::MailService;

/// Wraps any [`MailService`] so core services and the worker can use it
pub struct MailerAdapter {
    inner: Box<dyn MailService>,
}

impl MailerAdapter {
    pub fn new(inner: Box<dyn MailService>) -> Self {
        Self { inner }
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[async_trait]
impl MailerTrait for MailerAdapter {
    async fn send(&self, message: &MailMessage) -> Result<String, String> {
        self.inner
            .send_mail(&message.to, &message.subject, &message.body)
            .await
            .map_err(|e| e.to_string())
    }
}
