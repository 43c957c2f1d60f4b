//! Domain entities representing core business objects.

pub mod attendance;
pub mod notification;
pub mod subject;
pub mod token;
pub mod verification_code;

// Re-export commonly used types
pub use attendance::{AttendanceRecord, AttendanceSession, SessionFilter, SubjectSummary};
pub use notification::{AccountNotice, AttendanceNotice, JobPayload, NotificationJob};
pub use subject::{Role, Subject};
pub use token::{Claims, JWT_AUDIENCE, JWT_ISSUER, SESSION_TOKEN_EXPIRY_SECONDS};
pub use verification_code::{
    CodePurpose, VerificationCode, CODE_LENGTH, RESET_CREDENTIAL_TTL_HOURS,
    VERIFY_ACCOUNT_TTL_HOURS,
};
