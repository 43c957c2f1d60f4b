//! Plain-text mail composition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A composed outbound email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Account verification code
    pub fn verification(to: &str, name: &str, code: &str, valid_hours: i64) -> Self {
        Self {
            to: to.to_string(),
            subject: "Verify Your Email Address".to_string(),
            body: format!(
                "Hello {name},\n\n\
                 Your verification code is: {code}\n\n\
                 The code expires in {valid_hours} hours. If you did not create an account, \
                 you can ignore this email.\n"
            ),
        }
    }

    /// Credential reset code
    pub fn password_reset(to: &str, name: &str, code: &str, valid_hours: i64) -> Self {
        Self {
            to: to.to_string(),
            subject: "Reset Your Password".to_string(),
            body: format!(
                "Hello {name},\n\n\
                 Use this code to reset your password: {code}\n\n\
                 The code expires in {valid_hours} hour(s). If you did not request a reset, \
                 you can ignore this email.\n"
            ),
        }
    }

    /// Confirmation sent after a completed credential reset
    pub fn password_reset_completed(to: &str, name: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Welcome to Employee Management System".to_string(),
            body: format!(
                "Hello {name},\n\n\
                 Your password has been reset and your account is ready to use. \
                 If you did not make this change, contact your administrator immediately.\n"
            ),
        }
    }

    /// Clock-in or clock-out notice; `action` is "Clock In" or "Clock Out"
    pub fn attendance(to: &str, name: &str, action: &str, time: DateTime<Utc>) -> Self {
        Self {
            to: to.to_string(),
            subject: format!("Attendance Notification: {action}"),
            body: format!(
                "Hello {name},\n\n\
                 Your {action} was recorded at {}.\n",
                time.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}
