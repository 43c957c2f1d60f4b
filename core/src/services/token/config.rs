//! Configuration for the token signer

use jsonwebtoken::Algorithm;

use wf_shared::config::JwtConfig;

use crate::domain::entities::{JWT_AUDIENCE, JWT_ISSUER, SESSION_TOKEN_EXPIRY_SECONDS};

/// Configuration for the token signer
#[derive(Debug, Clone)]
pub struct TokenSignerConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family)
    pub algorithm: Algorithm,
    /// Session token lifetime in seconds
    pub expiry_seconds: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for TokenSignerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            expiry_seconds: SESSION_TOKEN_EXPIRY_SECONDS,
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
        }
    }
}

impl From<&JwtConfig> for TokenSignerConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            algorithm: Algorithm::HS256,
            expiry_seconds: config.access_token_expiry,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }
}
