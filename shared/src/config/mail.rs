//! Outbound mail configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Mail delivery backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Log messages instead of delivering them
    #[default]
    Mock,
    /// Resend HTTP API
    Resend,
}

impl std::str::FromStr for MailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(MailProvider::Mock),
            "resend" => Ok(MailProvider::Resend),
            _ => Err(format!("Invalid mail provider: {}", s)),
        }
    }
}

/// Mail provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Which backend delivers mail
    #[serde(default)]
    pub provider: MailProvider,

    /// API key for the HTTP provider
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Sender address
    #[serde(default = "default_from")]
    pub from: String,

    /// Provider API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: MailProvider::default(),
            api_key: None,
            from: default_from(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MailConfig {
    /// Read `MAIL_PROVIDER`, `RESEND_API_KEY`, `MAIL_FROM` and `MAIL_API_BASE_URL`
    ///
    /// An unknown provider name falls back to the mock backend.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("MAIL_PROVIDER", defaults.provider),
            api_key: std::env::var("RESEND_API_KEY").ok(),
            from: env_or("MAIL_FROM", defaults.from),
            api_base_url: env_or("MAIL_API_BASE_URL", defaults.api_base_url),
            ..defaults
        }
    }
}

fn default_from() -> String {
    String::from("Workforce <no-reply@workforce.local>")
}

fn default_api_base_url() -> String {
    String::from("https://api.resend.com")
}

fn default_timeout_secs() -> u64 {
    10
}
