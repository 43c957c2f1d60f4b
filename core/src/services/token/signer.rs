//! JWT signer implementation

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::{Claims, Subject};
use crate::errors::{DomainError, TokenError};

use super::config::TokenSignerConfig;

/// Trait for session token signing
pub trait TokenSignerTrait: Send + Sync {
    /// Build session claims for `subject` issued at `now`
    fn claims_for(&self, subject: &Subject, now: DateTime<Utc>) -> Claims;

    /// Sign claims into a compact token
    fn sign(&self, claims: &Claims) -> Result<String, DomainError>;

    /// Verify a token's signature, issuer, audience and validity window
    fn verify(&self, token: &str) -> Result<Claims, DomainError>;
}

/// HMAC-signed JWT session tokens
pub struct JwtTokenSigner {
    config: TokenSignerConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenSigner {
    /// Creates a new signer
    ///
    /// # Errors
    ///
    /// * `DomainError::Internal` - Empty signing secret
    pub fn new(config: TokenSignerConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.is_empty() {
            return Err(DomainError::Internal {
                message: "JWT secret must not be empty".to_string(),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }
}

impl TokenSignerTrait for JwtTokenSigner {
    fn claims_for(&self, subject: &Subject, now: DateTime<Utc>) -> Claims {
        Claims::for_subject(
            subject,
            now,
            self.config.expiry_seconds,
            &self.config.issuer,
            &self.config.audience,
        )
    }

    fn sign(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                ErrorKind::ImmatureSignature => DomainError::Token(TokenError::TokenNotYetValid),
                ErrorKind::InvalidSignature => DomainError::Token(TokenError::InvalidSignature),
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                    DomainError::Token(TokenError::InvalidClaims)
                }
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })?;

        Ok(token_data.claims)
    }
}
