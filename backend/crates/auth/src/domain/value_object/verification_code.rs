//! Verification Code Value Object
//!
//! The short numeric one-time code mailed to an account during email
//! verification. Stored on the account as `pending_code` until
//! consumed.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Default generated code length in digits
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Maximum accepted length of a submitted code.
///
/// Matches the storage column width. Oversized submissions are rejected
/// before any account lookup or comparison.
pub const MAX_CODE_LENGTH: usize = 10;

/// A one-time verification code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generate a random numeric code of the given length.
    pub fn generate(length: usize) -> Self {
        let length = length.clamp(1, MAX_CODE_LENGTH);
        Self(platform::crypto::random_numeric_code(length))
    }

    /// Accept a submitted code, enforcing the length guard first.
    pub fn from_submitted(code: impl Into<String>) -> Result<Self, AuthError> {
        let code = code.into();
        if code.len() > MAX_CODE_LENGTH {
            return Err(AuthError::CodeTooLong);
        }
        Ok(Self(code))
    }

    /// Wrap a stored database value.
    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Exact string comparison against another code.
    pub fn matches(&self, other: &VerificationCode) -> bool {
        self.0 == other.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
