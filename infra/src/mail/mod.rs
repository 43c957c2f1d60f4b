//! Mail Service Module
//!
//! Outbound mail delivery for verification codes and notification jobs.
//!
//! ## Features
//!
//! - **Mail Service Trait**: Common interface for all mail providers
//! - **Mock Implementation**: Log output for development
//! - **Resend Support**: Production delivery through the Resend HTTP API
//! - **Core Adapter**: Bridges any provider to the core `MailerTrait`

pub mod mail_service;
pub mod mock_mail;
pub mod resend;
pub mod trait_adapter;

pub use mail_service::MailService;
pub use mock_mail::{MockMailService, SentMail};
pub use resend::ResendMailService;
pub use trait_adapter::MailerAdapter;

use crate::config::{MailConfig, MailProvider};

#[cfg(test)]
mod tests;

/// Create a mail service based on configuration
///
/// A misconfigured HTTP provider falls back to the mock service with a
/// warning so that development setups keep working.
pub fn create_mail_service(config: &MailConfig) -> Box<dyn MailService> {
    match config.provider {
        MailProvider::Mock => Box::new(MockMailService::new()),
        MailProvider::Resend => match ResendMailService::new(config) {
            Ok(service) => Box::new(service),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize Resend mail service");
                tracing::warn!("Falling back to mock mail service");
                Box::new(MockMailService::new())
            }
        },
    }
}
