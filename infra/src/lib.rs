//! Adapters behind the `wf_core` traits
//!
//! - `database`: MySQL repositories and the pool they share
//! - `queue`: Redis list holding notification jobs
//! - `mail`: Resend HTTP delivery, or an in-memory mock
//! - `worker`: the loop that drains the queue into mail
//!
//! Cargo features `mysql` and `redis-queue` are on by default.

pub use wf_core::errors::*;

#[cfg(feature = "mysql")]
pub mod database;

pub mod mail;

#[cfg(feature = "redis-queue")]
pub mod queue;

pub mod worker;

/// Config structs re-exported from `wf_shared`
pub mod config {
    pub use wf_shared::config::{
        CacheConfig, DatabaseConfig, MailConfig, MailProvider, NotificationConfig,
    };
}

/// Failures raised by the adapters before they are mapped into `DomainError`
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail provider error
    #[error("Mail service error: {0}")]
    Mail(String),

    /// Job queue error
    #[error("Queue error: {0}")]
    Queue(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
