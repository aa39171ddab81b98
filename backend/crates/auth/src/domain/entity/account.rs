//! Account Entity
//!
//! The registered account and its verification state machine:
//! `Registered(unverified)` -> `Verified`. The email is held twice: as
//! a slow Argon2id hash (at-rest protection) and as the deterministic
//! search key that uniquely indexes the account.

use chrono::{DateTime, Utc};
use kernel::id::{Id, markers};
use platform::password::SecretHash;

use crate::domain::value_object::{
    account_password::PasswordDigest, email::Email, verification_code::VerificationCode,
};
use crate::error::AuthError;

/// Typed account identifier
pub type AccountId = Id<markers::Account>;

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier (token subject)
    pub account_id: AccountId,
    /// Display name (stored in clear)
    pub display_name: String,
    /// Slow hash of the normalized email (defense in depth)
    pub email_hash: SecretHash,
    /// Deterministic SHA-256 search key (unique index)
    pub email_search_key: String,
    /// Argon2id password hash
    pub password_hash: PasswordDigest,
    /// Optional profile photo reference
    pub photo: Option<String>,
    /// Whether the account may log in
    pub active: bool,
    /// Whether the email has been confirmed
    pub verified: bool,
    /// Currently pending one-time verification code
    pub pending_code: Option<VerificationCode>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new unverified account.
    pub fn new(
        display_name: String,
        email: &Email,
        email_hash: SecretHash,
        password_hash: PasswordDigest,
    ) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            display_name,
            email_search_key: email.search_key(),
            email_hash,
            password_hash,
            photo: None,
            active: true,
            verified: false,
            pending_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a verification code may be requested.
    ///
    /// Codes exist only to verify the email; once verified, requests
    /// are rejected. Re-sends before verification rotate the pending
    /// code.
    pub fn can_request_code(&self) -> bool {
        !self.verified
    }

    /// Store a freshly generated pending code.
    pub fn set_pending_code(&mut self, code: VerificationCode) {
        self.pending_code = Some(code);
        self.updated_at = Utc::now();
    }

    /// Consume a submitted code.
    ///
    /// On match the account becomes verified and the code is cleared,
    /// so the same code cannot be confirmed twice. On mismatch (or no
    /// pending code) the pending code is left in place for a retry.
    pub fn confirm_code(&mut self, submitted: &VerificationCode) -> Result<(), AuthError> {
        match &self.pending_code {
            Some(pending) if pending.matches(submitted) => {
                self.verified = true;
                self.pending_code = None;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(AuthError::InvalidCode),
        }
    }

    /// Whether the account may log in.
    pub fn can_login(&self) -> bool {
        self.active
    }
}
