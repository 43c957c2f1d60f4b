//! Resend Mail Service Implementation
//!
//! Delivers plain-text mail through the Resend HTTP API
//! (`POST {api_base_url}/emails`). Rate limiting and server errors are
//! retried with exponential backoff; other client errors are not.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use wf_shared::utils::email::mask_email;

use super::mail_service::MailService;
use crate::config::MailConfig;
use crate::InfrastructureError;

/// Maximum delivery attempts per message
const MAX_ATTEMPTS: u32 = 3;

/// Initial retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Resend mail service implementation
pub struct ResendMailService {
    client: Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl ResendMailService {
    /// Create a new Resend mail service
    ///
    /// # Returns
    /// * `Err(InfrastructureError::Config)` - No API key configured
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("RESEND_API_KEY not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            from = %mask_email(&config.from),
            "Resend mail service initialized"
        );

        Ok(Self {
            client,
            api_key,
            from: config.from.clone(),
            endpoint: format!("{}/emails", config.api_base_url.trim_end_matches('/')),
        })
    }

    /// The URL messages are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_once(
        &self,
        request: &SendEmailRequest<'_>,
    ) -> Result<String, (bool, InfrastructureError)> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| (e.is_timeout() || e.is_connect(), InfrastructureError::Http(e)))?;

        let status = response.status();
        if status.is_success() {
            let body: SendEmailResponse = response
                .json()
                .await
                .map_err(|e| (false, InfrastructureError::Http(e)))?;
            return Ok(body.id);
        }

        let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
        let detail = response.text().await.unwrap_or_default();
        Err((
            retryable,
            InfrastructureError::Mail(format!("Resend returned {}: {}", status, detail)),
        ))
    }
}

#[async_trait]
impl MailService for ResendMailService {
    async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let request = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject,
            text: body,
        };

        let mut attempts = 0;
        let mut delay = Duration::from_millis(RETRY_DELAY_MS);

        loop {
            attempts += 1;
            debug!(
                "Sending mail attempt {}/{} to {}",
                attempts,
                MAX_ATTEMPTS,
                mask_email(to)
            );

            match self.post_once(&request).await {
                Ok(message_id) => {
                    info!(
                        to = %mask_email(to),
                        message_id = %message_id,
                        "Mail sent via Resend"
                    );
                    return Ok(message_id);
                }
                Err((retryable, e)) => {
                    error!(
                        "Failed to send mail (attempt {}/{}): {}",
                        attempts, MAX_ATTEMPTS, e
                    );
                    if !retryable || attempts >= MAX_ATTEMPTS {
                        return Err(e);
                    }
                    warn!("Retrying mail delivery after {:?}", delay);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Resend"
    }
}
