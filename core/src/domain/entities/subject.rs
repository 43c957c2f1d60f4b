//! Subject entity representing a workforce member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wf_shared::utils::email::normalize_email;

/// Role granted to a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// A workforce member who clocks in and out and holds credentials
///
/// Profile management lives outside this crate. Services here only read the
/// identity fields and write `is_verified` and `password_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique identifier for the subject
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Login credential, stored normalized (trimmed, lowercase)
    pub email: String,

    pub phone_number: Option<String>,

    /// Employer-assigned identifier, if any
    pub employee_identifier: Option<String>,

    /// bcrypt hash of the secret; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Whether the email address has been verified
    pub is_verified: bool,

    pub roles: Vec<Role>,

    /// Timestamp when the subject was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the subject was last updated
    pub updated_at: DateTime<Utc>,
}

impl Subject {
    /// Creates a new, unverified subject with the default `USER` role
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: &str,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: normalize_email(email),
            phone_number: None,
            employee_identifier: None,
            password_hash: password_hash.into(),
            is_verified: false,
            roles: vec![Role::User],
            created_at: now,
            updated_at: now,
        }
    }

    /// Name used in notifications, e.g. "Jane Doe"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Marks the subject as verified. There is no way back.
    pub fn verify(&mut self) {
        self.is_verified = true;
        self.updated_at = Utc::now();
    }

    /// Replaces the stored secret hash
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Role names as carried in session token claims
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subject() {
        let subject = Subject::new("Jane", "Doe", " Jane@Example.com ", "hash");

        assert_eq!(subject.email, "jane@example.com");
        assert_eq!(subject.display_name(), "Jane Doe");
        assert!(!subject.is_verified);
        assert!(subject.has_role(Role::User));
        assert!(!subject.has_role(Role::Admin));
        assert_eq!(subject.created_at, subject.updated_at);
    }

    #[test]
    fn test_verify_is_one_way() {
        let mut subject = Subject::new("Jane", "Doe", "jane@example.com", "hash");
        subject.verify();
        assert!(subject.is_verified);
        subject.verify();
        assert!(subject.is_verified);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let subject = Subject::new("Jane", "Doe", "jane@example.com", "$2b$12$secret");
        let json = serde_json::to_string(&subject).unwrap();
        assert!(!json.contains("$2b$12$secret"));

        let back: Subject = serde_json::from_str(&json).unwrap();
        assert!(back.password_hash.is_empty());
        assert_eq!(back.id, subject.id);
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("super_admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert!("manager".parse::<Role>().is_err());

        let subject = Subject::new("A", "B", "a@b.co", "h");
        assert_eq!(subject.role_names(), vec!["USER".to_string()]);
    }
}
