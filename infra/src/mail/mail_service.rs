//! Mail Service Interface

use async_trait::async_trait;

use crate::InfrastructureError;

/// Mail service trait for sending plain-text messages
///
/// Implementations include:
/// - Resend HTTP API
/// - Mock implementation for development
#[async_trait]
pub trait MailService: Send + Sync {
    /// Send a message
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError>;

    /// Name of the provider, e.g. "Resend" or "Mock"
    fn provider_name(&self) -> &str;
}
