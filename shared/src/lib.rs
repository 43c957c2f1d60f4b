//! Shared utilities and common types for the workforce services
//!
//! This crate provides functionality used across all workspace members:
//! - Configuration types loaded from the environment
//! - Email and secret validation helpers

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    MailConfig, MailProvider, NotificationConfig,
};
pub use utils::{email, validation};
