//! Verification code entity shared by account verification and credential reset.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Lifetime of an account verification code (24 hours)
pub const VERIFY_ACCOUNT_TTL_HOURS: i64 = 24;

/// Lifetime of a credential reset code (1 hour)
pub const RESET_CREDENTIAL_TTL_HOURS: i64 = 1;

/// What a code may be redeemed for
///
/// Lookups are always scoped by purpose, so a reset code can never verify
/// an account even when the digits match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    VerifyAccount,
    ResetCredential,
}

impl CodePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodePurpose::VerifyAccount => "verify_account",
            CodePurpose::ResetCredential => "reset_credential",
        }
    }

    /// Default lifetime of a code issued for this purpose
    pub fn default_ttl(&self) -> Duration {
        match self {
            CodePurpose::VerifyAccount => Duration::hours(VERIFY_ACCOUNT_TTL_HOURS),
            CodePurpose::ResetCredential => Duration::hours(RESET_CREDENTIAL_TTL_HOURS),
        }
    }
}

impl std::fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CodePurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verify_account" => Ok(CodePurpose::VerifyAccount),
            "reset_credential" => Ok(CodePurpose::ResetCredential),
            _ => Err(format!("Invalid code purpose: {}", s)),
        }
    }
}

/// Single-use secret tied to one subject and one purpose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Unique identifier for the verification code
    pub id: Uuid,

    /// Subject the code was issued to
    pub subject_id: Uuid,

    pub purpose: CodePurpose,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Creates a code issued at `now` that expires after `ttl`
    ///
    /// An expiry past the representable range is clamped to the maximum
    /// instant; use [`VerificationCode::expiry_for`] to reject it instead.
    pub fn new(
        subject_id: Uuid,
        purpose: CodePurpose,
        code: String,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            purpose,
            code,
            created_at: now,
            expires_at: Self::expiry_for(now, ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// `now + ttl`, or `None` when the sum overflows
    pub fn expiry_for(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
        now.checked_add_signed(ttl)
    }

    /// Generates a 6-digit code from the operating system CSPRNG
    pub fn generate_code() -> String {
        let num: u32 = OsRng.gen_range(0..1_000_000);
        format!("{:0width$}", num, width = CODE_LENGTH)
    }

    /// A code is redeemable strictly before its expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether this record is the one requested, comparing the code in constant time
    pub fn matches(&self, subject_id: Uuid, purpose: CodePurpose, code: &str) -> bool {
        self.subject_id == subject_id
            && self.purpose == purpose
            && constant_time_eq(self.code.as_bytes(), code.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..100 {
            let code = VerificationCode::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_code_uniqueness() {
        let codes: std::collections::HashSet<String> =
            (0..100).map(|_| VerificationCode::generate_code()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_expiry_boundary() {
        let code = VerificationCode::new(
            Uuid::new_v4(),
            CodePurpose::VerifyAccount,
            "482913".to_string(),
            issued_at(),
            Duration::hours(24),
        );

        assert_eq!(code.expires_at, issued_at() + Duration::hours(24));
        assert!(!code.is_expired_at(issued_at() + Duration::hours(1)));
        assert!(!code.is_expired_at(code.expires_at - Duration::milliseconds(1)));
        assert!(code.is_expired_at(code.expires_at));
    }

    #[test]
    fn test_overflowing_ttl_is_detected() {
        let far = Duration::days(365 * 1_000_000);
        assert_eq!(VerificationCode::expiry_for(issued_at(), far), None);

        let code = VerificationCode::new(
            Uuid::new_v4(),
            CodePurpose::VerifyAccount,
            "000001".to_string(),
            issued_at(),
            far,
        );
        assert_eq!(code.expires_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_generated_codes_cover_the_range() {
        let codes: Vec<u32> = (0..2000)
            .map(|_| VerificationCode::generate_code().parse().unwrap())
            .collect();
        assert!(codes.iter().all(|c| *c < 1_000_000));
        assert!(codes.iter().any(|c| *c >= 500_000));
        assert!(codes.iter().any(|c| *c < 500_000));
    }

    #[test]
    fn test_matches_is_scoped_by_purpose() {
        let subject_id = Uuid::new_v4();
        let code = VerificationCode::new(
            subject_id,
            CodePurpose::ResetCredential,
            "123456".to_string(),
            issued_at(),
            Duration::hours(1),
        );

        assert!(code.matches(subject_id, CodePurpose::ResetCredential, "123456"));
        assert!(!code.matches(subject_id, CodePurpose::VerifyAccount, "123456"));
        assert!(!code.matches(subject_id, CodePurpose::ResetCredential, "123457"));
        assert!(!code.matches(Uuid::new_v4(), CodePurpose::ResetCredential, "123456"));
    }

    #[test]
    fn test_purpose_defaults() {
        assert_eq!(CodePurpose::VerifyAccount.default_ttl(), Duration::hours(24));
        assert_eq!(CodePurpose::ResetCredential.default_ttl(), Duration::hours(1));
        assert_eq!(
            "reset_credential".parse::<CodePurpose>().unwrap(),
            CodePurpose::ResetCredential
        );
        assert_eq!(CodePurpose::VerifyAccount.to_string(), "verify_account");
    }
}
