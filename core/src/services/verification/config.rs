//! Configuration for the verification service

use chrono::Duration;

use crate::domain::entities::CodePurpose;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Lifetime of account verification codes
    pub verify_account_ttl: Duration,
    /// Lifetime of credential reset codes
    pub reset_credential_ttl: Duration,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            verify_account_ttl: CodePurpose::VerifyAccount.default_ttl(),
            reset_credential_ttl: CodePurpose::ResetCredential.default_ttl(),
        }
    }
}

impl VerificationServiceConfig {
    /// Lifetime applied to codes issued for `purpose`
    pub fn ttl_for(&self, purpose: CodePurpose) -> Duration {
        match purpose {
            CodePurpose::VerifyAccount => self.verify_account_ttl,
            CodePurpose::ResetCredential => self.reset_credential_ttl,
        }
    }
}
