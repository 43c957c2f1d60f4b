//! Main authentication service implementation

use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use wf_shared::utils::email::{is_valid_email, mask_email};
use wf_shared::utils::validation::{is_valid_secret_length, SECRET_MAX_LENGTH, SECRET_MIN_LENGTH};

use crate::domain::clock::Clock;
use crate::domain::entities::{Claims, CodePurpose, NotificationJob, Subject};
use crate::domain::value_objects::LoginPayload;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{SubjectRepository, VerificationCodeRepository};
use crate::services::notification::{
    JobQueueTrait, MailMessage, MailerTrait, NotificationDispatcher,
};
use crate::services::token::TokenSignerTrait;
use crate::services::verification::VerificationService;

use super::config::AuthServiceConfig;
use super::password::{hash_secret, verify_secret};

/// Authentication service for login, verification and credential changes
pub struct AuthService<U, V, M, Q, T>
where
    U: SubjectRepository,
    V: VerificationCodeRepository,
    M: MailerTrait,
    Q: JobQueueTrait + 'static,
    T: TokenSignerTrait,
{
    /// Subject repository for identity and secret storage
    subject_repository: Arc<U>,
    /// Verification service for code issue and redemption
    verification_service: Arc<VerificationService<V>>,
    /// Mailer for codes, which are sent directly rather than queued
    mailer: Arc<M>,
    /// Dispatcher for queued notices
    dispatcher: Arc<NotificationDispatcher<Q>>,
    /// Session token signer
    token_signer: Arc<T>,
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Hash checked when the email is unknown, so both login failures pay
    /// for one bcrypt verify at the configured cost
    pub(super) dummy_hash: OnceCell<String>,
}

impl<U, V, M, Q, T> AuthService<U, V, M, Q, T>
where
    U: SubjectRepository,
    V: VerificationCodeRepository,
    M: MailerTrait,
    Q: JobQueueTrait + 'static,
    T: TokenSignerTrait,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `subject_repository` - Repository for subject data
    /// * `verification_service` - Service for verification codes
    /// * `mailer` - Mail delivery for codes
    /// * `dispatcher` - Notification dispatcher for queued notices
    /// * `token_signer` - Session token signer
    /// * `clock` - Time source
    /// * `config` - Service configuration
    pub fn new(
        subject_repository: Arc<U>,
        verification_service: Arc<VerificationService<V>>,
        mailer: Arc<M>,
        dispatcher: Arc<NotificationDispatcher<Q>>,
        token_signer: Arc<T>,
        clock: Arc<dyn Clock>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            subject_repository,
            verification_service,
            mailer,
            dispatcher,
            token_signer,
            clock,
            config,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Register a new subject and mail a verification code
    ///
    /// # Returns
    ///
    /// * `Ok(Subject)` - The unverified subject
    /// * `Err(AuthError::UnverifiedAccount)` - The email belongs to an
    ///   unverified account; a fresh code has been sent to it
    /// * `Err(DomainError::Validation)` - Email already registered and
    ///   verified, or invalid input
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<Subject> {
        Self::require("first_name", first_name)?;
        Self::require("last_name", last_name)?;
        Self::validate_email(email)?;
        Self::validate_new_secret(password)?;

        if let Some(existing) = self.subject_repository.find_by_email(email).await? {
            if existing.is_verified {
                tracing::info!(
                    subject_id = %existing.id,
                    event = "registration_rejected",
                    "Email already registered"
                );
                return Err(DomainError::Validation {
                    message: "Email already registered".to_string(),
                });
            }

            self.send_verification_code(&existing).await?;
            return Err(AuthError::UnverifiedAccount.into());
        }

        let password_hash = hash_secret(password, self.config.bcrypt_cost).await?;
        let subject = self
            .subject_repository
            .create(Subject::new(first_name.trim(), last_name.trim(), email, password_hash))
            .await?;

        tracing::info!(
            subject_id = %subject.id,
            event = "subject_registered",
            "Subject registered"
        );

        self.send_verification_code(&subject).await?;
        Ok(subject)
    }

    /// Log in with email and secret
    ///
    /// This method:
    /// 1. Looks up the subject by email
    /// 2. Verifies the secret against the stored bcrypt hash
    /// 3. For unverified subjects, re-sends a verification code and refuses
    /// 4. Signs a session token for verified subjects
    ///
    /// # Returns
    ///
    /// * `Ok(LoginPayload)` - Identity and session token
    /// * `Err(AuthError::Unauthorized)` - Unknown email or wrong secret
    /// * `Err(AuthError::UnverifiedAccount)` - Correct secret, unverified account
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginPayload> {
        Self::validate_email(email)?;

        // Step 1: Look up the subject
        let Some(subject) = self.subject_repository.find_by_email(email).await? else {
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| hash_secret("unknown-account", self.config.bcrypt_cost))
                .await?;
            verify_secret(password, dummy).await?;

            tracing::warn!(
                email = %mask_email(email),
                event = "login_failed",
                reason = "unknown_email",
                "Login failed"
            );
            return Err(AuthError::Unauthorized.into());
        };

        // Step 2: Verify the secret
        if !verify_secret(password, &subject.password_hash).await? {
            tracing::warn!(
                subject_id = %subject.id,
                event = "login_failed",
                reason = "wrong_secret",
                "Login failed"
            );
            return Err(AuthError::Unauthorized.into());
        }

        // Step 3: Unverified accounts get a fresh code instead of a session
        if !subject.is_verified {
            if let Err(e) = self.send_verification_code(&subject).await {
                tracing::warn!(
                    subject_id = %subject.id,
                    error = %e,
                    event = "verification_resend_failed",
                    "Could not re-issue verification code during login"
                );
            }
            tracing::info!(
                subject_id = %subject.id,
                event = "login_unverified",
                "Login refused for unverified account"
            );
            return Err(AuthError::UnverifiedAccount.into());
        }

        // Step 4: Sign the session token
        let claims = self.token_signer.claims_for(&subject, self.clock.now());
        let token = self.token_signer.sign(&claims)?;

        tracing::info!(
            subject_id = %subject.id,
            event = "login_succeeded",
            "Subject logged in"
        );

        Ok(LoginPayload::new(&subject, token, claims.exp - claims.iat))
    }

    /// Issue and email a new account verification code
    ///
    /// Outstanding codes never cause an error; each call issues a new one.
    pub async fn request_verification(&self, email: &str) -> DomainResult<()> {
        Self::validate_email(email)?;

        match self.subject_repository.find_by_email(email).await? {
            Some(subject) => self.send_verification_code(&subject).await,
            None => self.unknown_account(email, "verification_requested"),
        }
    }

    /// Redeem an account verification code
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The account is now verified
    /// * `Err(AuthError::InvalidOrExpiredCode)` - Wrong, expired or used code,
    ///   or unknown email
    pub async fn verify_account(&self, email: &str, code: &str) -> DomainResult<()> {
        let Some(subject) = self.subject_repository.find_by_email(email).await? else {
            return Err(AuthError::InvalidOrExpiredCode.into());
        };

        self.verification_service
            .validate(subject.id, CodePurpose::VerifyAccount, code)
            .await?;
        Ok(())
    }

    /// Issue and email a credential reset code
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Code issued, or unknown email while masking is enabled
    /// * `Err(DomainError::NotFound)` - Unknown email while masking is disabled
    pub async fn request_password_reset(&self, email: &str) -> DomainResult<()> {
        Self::validate_email(email)?;

        let Some(subject) = self.subject_repository.find_by_email(email).await? else {
            return self.unknown_account(email, "password_reset_requested");
        };

        let issued = self
            .verification_service
            .issue_for(subject.id, CodePurpose::ResetCredential)
            .await?;
        let valid_hours = (issued.expires_at - issued.created_at).num_hours();
        let message = MailMessage::password_reset(
            &subject.email,
            &subject.display_name(),
            &issued.code,
            valid_hours,
        );

        self.send_mail(message, subject.id).await;

        Ok(())
    }

    /// Set a new secret using a credential reset code
    ///
    /// On success a confirmation notice is dispatched best-effort.
    pub async fn complete_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        Self::validate_new_secret(new_password)?;

        let Some(subject) = self.subject_repository.find_by_email(email).await? else {
            return Err(AuthError::InvalidOrExpiredCode.into());
        };

        // Hash before consuming so a hashing failure cannot burn the code
        let password_hash = hash_secret(new_password, self.config.bcrypt_cost).await?;
        self.verification_service
            .validate(subject.id, CodePurpose::ResetCredential, code)
            .await?;

        self.subject_repository
            .update_password_hash(subject.id, &password_hash)
            .await?;

        tracing::info!(
            subject_id = %subject.id,
            event = "password_reset_completed",
            "Secret reset with verification code"
        );

        self.dispatcher
            .dispatch(NotificationJob::password_reset_completed(&subject, self.clock.now()))
            .await;

        Ok(())
    }

    /// Change the secret of an authenticated subject
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Secret replaced
    /// * `Err(AuthError::Unauthorized)` - Current secret does not match
    /// * `Err(DomainError::NotFound)` - Unknown subject
    pub async fn change_password(
        &self,
        subject_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        Self::validate_new_secret(new_password)?;

        let subject = self
            .subject_repository
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subject"))?;

        if !verify_secret(current_password, &subject.password_hash).await? {
            tracing::warn!(
                subject_id = %subject_id,
                event = "password_change_failed",
                "Current secret did not match"
            );
            return Err(AuthError::Unauthorized.into());
        }

        let password_hash = hash_secret(new_password, self.config.bcrypt_cost).await?;
        self.subject_repository
            .update_password_hash(subject_id, &password_hash)
            .await?;

        tracing::info!(
            subject_id = %subject_id,
            event = "password_changed",
            "Secret changed"
        );
        Ok(())
    }

    /// Verify a session token presented on a request
    pub fn authenticate(&self, token: &str) -> DomainResult<Claims> {
        self.token_signer.verify(token)
    }

    /// Issue a verification code and mail it; mail failures are only logged
    async fn send_verification_code(&self, subject: &Subject) -> DomainResult<()> {
        let issued = self
            .verification_service
            .issue_for(subject.id, CodePurpose::VerifyAccount)
            .await?;
        let valid_hours = (issued.expires_at - issued.created_at).num_hours();
        let message = MailMessage::verification(
            &subject.email,
            &subject.display_name(),
            &issued.code,
            valid_hours,
        );

        self.send_mail(message, subject.id).await;

        Ok(())
    }

    async fn send_mail(&self, message: MailMessage, subject_id: Uuid) {
        if let Err(e) = self.mailer.send(&message).await {
            tracing::error!(
                subject_id = %subject_id,
                to = %mask_email(&message.to),
                mail_subject = %message.subject,
                error = %e,
                event = "mail_send_failed",
                "Failed to send mail"
            );
        }
    }

    fn unknown_account(&self, email: &str, event: &'static str) -> DomainResult<()> {
        tracing::info!(
            email = %mask_email(email),
            event = event,
            masked = self.config.mask_unknown_accounts,
            "Request for unknown account"
        );
        if self.config.mask_unknown_accounts {
            Ok(())
        } else {
            Err(DomainError::not_found("Subject"))
        }
    }

    fn require(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::RequiredField {
                field: field.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn validate_email(email: &str) -> Result<(), ValidationError> {
        if is_valid_email(email) {
            Ok(())
        } else {
            Err(ValidationError::InvalidEmail)
        }
    }

    fn validate_new_secret(secret: &str) -> Result<(), ValidationError> {
        if is_valid_secret_length(secret) {
            Ok(())
        } else {
            Err(ValidationError::InvalidLength {
                field: "new_password".to_string(),
                min: SECRET_MIN_LENGTH,
                max: SECRET_MAX_LENGTH,
                actual: secret.chars().count(),
            })
        }
    }
}
