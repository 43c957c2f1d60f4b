//! Successful login response value object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Subject;

/// Identity and session token returned after a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginPayload {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    /// Signed session token
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

impl LoginPayload {
    pub fn new(subject: &Subject, access_token: String, expires_in: i64) -> Self {
        Self {
            id: subject.id,
            email: subject.email.clone(),
            first_name: subject.first_name.clone(),
            last_name: subject.last_name.clone(),
            roles: subject.role_names(),
            access_token,
            expires_in,
        }
    }
}
