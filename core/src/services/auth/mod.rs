//! Credential lifecycle
//!
//! This module provides:
//! - Email and secret login with session token issuance
//! - Account verification by emailed code
//! - Credential reset by emailed code
//! - Secret change for authenticated subjects

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{hash_secret, verify_secret};
pub use service::AuthService;
