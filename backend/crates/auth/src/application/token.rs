//! Token Service
//!
//! Issues and verifies the two stateless token classes. Access and
//! refresh tokens are signed with distinct secrets, so a refresh token
//! never passes access verification and vice versa. Expiry lives in the
//! claims and is enforced here at verification time; nothing is stored
//! server-side.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Token class, selecting the signing secret and lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Access,
    Refresh,
}

/// Claims carried by both token classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Stateless token issuance and verification
#[derive(Debug, Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    fn secret(&self, class: TokenClass) -> &[u8] {
        match class {
            TokenClass::Access => &self.config.access_secret,
            TokenClass::Refresh => &self.config.refresh_secret,
        }
    }

    fn ttl_minutes(&self, class: TokenClass) -> i64 {
        match class {
            TokenClass::Access => self.config.access_ttl_minutes,
            TokenClass::Refresh => self.config.refresh_ttl_minutes,
        }
    }

    fn issue(&self, subject: &str, class: TokenClass) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.ttl_minutes(class))).timestamp(),
        };

        let token = platform::jwt::encode_hs256(self.secret(class), &claims)?;
        Ok(token)
    }

    fn verify(&self, token: &str, class: TokenClass) -> AuthResult<String> {
        let claims: Claims = platform::jwt::decode_hs256(self.secret(class), token)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::ExpiredToken);
        }
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims.sub)
    }

    /// Issue a short-lived access token for the given subject
    pub fn issue_access(&self, subject: &str) -> AuthResult<String> {
        self.issue(subject, TokenClass::Access)
    }

    /// Issue a long-lived refresh token for the given subject
    pub fn issue_refresh(&self, subject: &str) -> AuthResult<String> {
        self.issue(subject, TokenClass::Refresh)
    }

    /// Verify an access token and return its subject
    pub fn verify_access(&self, token: &str) -> AuthResult<String> {
        self.verify(token, TokenClass::Access)
    }

    /// Verify a refresh token and return its subject
    pub fn verify_refresh(&self, token: &str) -> AuthResult<String> {
        self.verify(token, TokenClass::Refresh)
    }

    /// Decode a token's claims without checking expiry.
    ///
    /// The signature is still verified; the access secret is tried
    /// first, then the refresh secret, so either class can be
    /// inspected. Diagnostics only; never use this to authenticate a
    /// request.
    pub fn decode_unsafe(&self, token: &str) -> AuthResult<Claims> {
        match platform::jwt::decode_hs256(self.secret(TokenClass::Access), token) {
            Ok(claims) => Ok(claims),
            Err(_) => {
                let claims =
                    platform::jwt::decode_hs256(self.secret(TokenClass::Refresh), token)?;
                Ok(claims)
            }
        }
    }

    /// Whether a token expires within the given window
    pub fn expires_within(&self, token: &str, minutes: i64) -> AuthResult<bool> {
        let claims = self.decode_unsafe(token)?;
        Ok(claims.exp <= (Utc::now() + Duration::minutes(minutes)).timestamp())
    }
}
