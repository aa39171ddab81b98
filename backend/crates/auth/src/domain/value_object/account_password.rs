//! Account Password Value Objects
//!
//! `RawPassword` enforces the length policy on incoming plaintext;
//! `PasswordDigest` wraps the stored Argon2id PHC hash.

use std::fmt;

use platform::password::{ClearSecret, SecretHash, SecretHashError};

use crate::error::AuthError;

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 90;

/// Validated clear text password (zeroized on drop)
pub struct RawPassword(ClearSecret);

impl RawPassword {
    /// Validate and wrap a plaintext password.
    pub fn new(raw: impl Into<String>) -> Result<Self, AuthError> {
        let secret = ClearSecret::new(raw);
        let char_count = secret.char_count();

        if char_count == 0 {
            return Err(AuthError::MissingFields);
        }
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordPolicy(format!(
                "must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(AuthError::PasswordPolicy(format!(
                "must be at most {} characters",
                MAX_PASSWORD_LENGTH
            )));
        }

        Ok(Self(secret))
    }

    fn secret(&self) -> &ClearSecret {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Stored password hash (Argon2id PHC string)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(SecretHash);

impl PasswordDigest {
    /// Hash a validated password with the optional application pepper.
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> Result<Self, SecretHashError> {
        Ok(Self(raw.secret().hash(pepper)?))
    }

    /// Wrap a stored database value without validation.
    ///
    /// A malformed stored value simply fails verification.
    pub fn from_db(stored: impl Into<String>) -> Self {
        Self(SecretHash::from_stored(stored))
    }

    /// Verify a plaintext password against this digest.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.secret(), pepper)
    }

    /// PHC string for storage
    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }
}
