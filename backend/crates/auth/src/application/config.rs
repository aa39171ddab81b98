//! Application Configuration
//!
//! Configuration for the auth application layer. Built once at startup
//! and injected into components; there are no ambient globals.

use crate::domain::value_object::verification_code::DEFAULT_CODE_LENGTH;

/// Default access token lifetime in minutes (8 hours)
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 60 * 8;

/// Default refresh token lifetime in minutes (1 day).
///
/// Must stay independently configured; the refresh TTL never falls
/// back to the access TTL.
pub const DEFAULT_REFRESH_TTL_MINUTES: i64 = 60 * 24;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret signing access tokens
    pub access_secret: Vec<u8>,
    /// Secret signing refresh tokens (distinct from the access secret)
    pub refresh_secret: Vec<u8>,
    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime in minutes
    pub refresh_ttl_minutes: i64,
    /// Generated verification code length in digits
    pub code_length: usize,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: Vec::new(),
            refresh_secret: Vec::new(),
            access_ttl_minutes: DEFAULT_ACCESS_TTL_MINUTES,
            refresh_ttl_minutes: DEFAULT_REFRESH_TTL_MINUTES,
            code_length: DEFAULT_CODE_LENGTH,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with random signing secrets (for development/tests)
    pub fn with_random_secrets() -> Self {
        Self {
            access_secret: platform::crypto::random_bytes(32),
            refresh_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
