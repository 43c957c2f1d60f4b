//! Session token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subject::Subject;

/// Default session token lifetime (1 day)
pub const SESSION_TOKEN_EXPIRY_SECONDS: i64 = 86_400;

/// Default JWT issuer
pub const JWT_ISSUER: &str = "workforce-core";

/// Default JWT audience
pub const JWT_AUDIENCE: &str = "workforce-api";

/// Claims structure for the session token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (subject ID)
    pub sub: String,

    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Role names, e.g. `["USER", "ADMIN"]`
    pub roles: Vec<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates session claims for a verified subject
    pub fn for_subject(
        subject: &Subject,
        now: DateTime<Utc>,
        expiry_seconds: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let expiry = now + Duration::seconds(expiry_seconds);
        Self {
            sub: subject.id.to_string(),
            email: subject.email.clone(),
            first_name: subject.first_name.clone(),
            last_name: subject.last_name.clone(),
            roles: subject.role_names(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the subject ID from the claims
    pub fn subject_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}
