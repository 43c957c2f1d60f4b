//! Business services containing domain logic and use cases.

pub mod attendance;
pub mod auth;
pub mod notification;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use attendance::AttendanceService;
pub use auth::{AuthService, AuthServiceConfig};
pub use notification::{
    DispatchOutcome, DispatcherConfig, JobQueueTrait, MailMessage, MailerTrait,
    NotificationDispatcher, NotificationProcessor,
};
pub use token::{JwtTokenSigner, TokenSignerConfig, TokenSignerTrait};
pub use verification::{VerificationService, VerificationServiceConfig};
