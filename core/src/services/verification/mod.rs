//! Verification code issuing and redemption
//!
//! Codes back both account verification and credential reset:
//! - Six-digit codes drawn from the OS CSPRNG
//! - Per-purpose lifetimes
//! - Atomic, single-use redemption scoped by purpose

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::VerificationService;
