//! SMTP Code Delivery
//!
//! Sends verification codes over authenticated TLS SMTP. Credentials
//! come from configuration at startup; a notifier built without them
//! reports `ServiceMisconfigured` on first use instead of panicking.

use lettre::message::header::ContentType;
use lettre::transport::smtp::PoolConfig;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::repository::CodeNotifier;
use crate::domain::value_object::{email::Email, verification_code::VerificationCode};
use crate::error::{AuthError, AuthResult};

/// SMTP transport settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Sender address, also the SMTP username
    pub username: String,
    /// SMTP password (app password for most providers)
    pub password: String,
    /// Relay hostname
    pub host: String,
    /// Relay port (typically 587)
    pub port: u16,
    /// Display name used in the From header
    pub sender_name: String,
}

/// SMTP-backed verification code notifier
pub struct SmtpCodeNotifier {
    config: Option<SmtpConfig>,
}

impl SmtpCodeNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// A notifier with no transport configured; every delivery fails
    /// with `ServiceMisconfigured`.
    pub fn unconfigured() -> Self {
        Self { config: None }
    }

    fn message_body(code: &VerificationCode) -> String {
        format!(
            "Hello,\n\
            \n\
            Use the following code to verify your account:\n\
            \n\
            {}\n\
            \n\
            If you did not request this code, you can ignore this email.\n",
            code
        )
    }

    fn build_message(&self, config: &SmtpConfig, to: &Email, code: &VerificationCode) -> AuthResult<Message> {
        let from = format!("{} <{}>", config.sender_name, config.username)
            .parse()
            .map_err(|e| AuthError::Internal(format!("Invalid sender address: {}", e)))?;
        let to = to
            .as_str()
            .parse()
            .map_err(|e| AuthError::Internal(format!("Invalid recipient address: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject("Your verification code")
            .header(ContentType::TEXT_PLAIN)
            .body(Self::message_body(code))
            .map_err(|e| AuthError::Internal(format!("Failed to build message: {}", e)))
    }

    fn build_transport(config: &SmtpConfig) -> AuthResult<AsyncSmtpTransport<Tokio1Executor>> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build SMTP transport");
                AuthError::ServiceMisconfigured
            })?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .port(config.port)
            .pool_config(PoolConfig::new().max_size(1))
            .build();

        Ok(transport)
    }
}

impl CodeNotifier for SmtpCodeNotifier {
    async fn deliver(&self, email: &Email, code: &VerificationCode) -> AuthResult<()> {
        let config = self.config.as_ref().ok_or(AuthError::ServiceMisconfigured)?;

        let message = self.build_message(config, email, code)?;
        let mailer = Self::build_transport(config)?;

        mailer.send(message).await.map_err(|e| {
            tracing::error!(error = %e, "SMTP send failed");
            AuthError::EmailDeliveryFailed
        })?;

        Ok(())
    }
}
