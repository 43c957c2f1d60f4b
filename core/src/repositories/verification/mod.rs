//! Verification code repository module.

mod r#trait;
pub use r#trait::VerificationCodeRepository;
