//! Slow Secret Hashing and Verification
//!
//! Argon2id hashing for secrets that must never be stored or compared
//! in plaintext. Used for account passwords and, as defense in depth,
//! for the email value at rest (the deterministic lookup variant lives
//! in [`crate::email_index`]).
//!
//! ## Security properties
//! - Memory-hard hashing (OWASP recommended parameters)
//! - Per-hash random salt, PHC string output
//! - Constant-time verification (delegated to the algorithm)
//! - Zeroization of clear text on drop
//! - Optional application-wide pepper

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Hashing errors
#[derive(Debug, Error)]
pub enum SecretHashError {
    /// Hashing operation failed
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    /// Stored value is not a valid PHC string
    #[error("Invalid secret hash format")]
    InvalidHashFormat,
}

/// Clear text secret with automatic memory zeroization.
///
/// Input is NFKC-normalized so that equivalent Unicode spellings hash
/// identically. Does not implement `Clone`; `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearSecret(String);

impl ClearSecret {
    /// Wrap a clear text secret, applying NFKC normalization.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized: String = raw.nfkc().collect();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Number of Unicode code points (for policy checks at the caller).
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Hash with Argon2id, returning a PHC-formatted [`SecretHash`].
    ///
    /// The optional pepper is appended to the secret before hashing and
    /// must be supplied again at verification time.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<SecretHash, SecretHashError> {
        let secret_bytes = match pepper {
            Some(p) => {
                let mut combined = self.as_bytes().to_vec();
                combined.extend_from_slice(p);
                combined
            }
            None => self.as_bytes().to_vec(),
        };

        let salt = SaltString::generate(OsRng);

        // Argon2id with OWASP defaults: m=19456 (19 MiB), t=2, p=1
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(&secret_bytes, &salt)
            .map_err(|e| SecretHashError::HashingFailed(e.to_string()))?;

        Ok(SecretHash {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearSecret").field(&"[REDACTED]").finish()
    }
}

/// Hashed secret in PHC string format (safe to store).
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash {
    hash: String,
}

impl SecretHash {
    /// Create from a PHC string (e.g. loaded from the database).
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, SecretHashError> {
        let hash = s.into();

        PasswordHash::new(&hash).map_err(|_| SecretHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Create from a stored value without validating the format.
    ///
    /// A malformed stored digest is tolerated here; [`Self::verify`]
    /// simply returns `false` for it.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    /// Get the PHC string for storage.
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a clear text secret against this hash.
    ///
    /// Returns `false` for a mismatch OR a malformed stored digest;
    /// verification never raises. Comparison is constant-time inside
    /// the algorithm.
    pub fn verify(&self, secret: &ClearSecret, pepper: Option<&[u8]>) -> bool {
        let secret_bytes = match pepper {
            Some(p) => {
                let mut combined = secret.as_bytes().to_vec();
                combined.extend_from_slice(p);
                combined
            }
            None => secret.as_bytes().to_vec(),
        };

        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(&secret_bytes, &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretHash").field("hash", &"[HASH]").finish()
    }
}
