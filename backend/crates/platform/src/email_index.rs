//! Email Search Key
//!
//! Deterministic fast-lookup hash of a normalized email address.
//!
//! Accounts store their email at rest as a slow Argon2id hash (see
//! [`crate::password`]). That hash is salted, so an existence check
//! against it would have to verify every row. The search key is the
//! complement: a plain SHA-256 of the lowercased email that serves as a
//! unique database index, giving direct lookups while the slow hash
//! still protects the raw address at rest. It is an index, NOT a
//! security control.

use crate::crypto::{hex_encode, sha256};

/// Length of a search key in hex characters (SHA-256)
pub const SEARCH_KEY_LENGTH: usize = 64;

/// Derive the deterministic search key for an email address.
///
/// Normalizes with trim + ASCII-insensitive lowercasing, then returns
/// the lowercase hex SHA-256 digest. Pure: the same email always maps
/// to the same key.
pub fn search_key(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    hex_encode(&sha256(normalized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_key_is_stable() {
        let a = search_key("user@example.com");
        let b = search_key("user@example.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), SEARCH_KEY_LENGTH);
    }

    #[test]
    fn test_search_key_normalizes_case_and_whitespace() {
        assert_eq!(
            search_key("  User@Example.COM  "),
            search_key("user@example.com")
        );
    }

    #[test]
    fn test_search_key_distinct_emails_differ() {
        assert_ne!(search_key("a@x.com"), search_key("b@x.com"));
        assert_ne!(search_key("a@x.com"), search_key("a@y.com"));
    }

    #[test]
    fn test_search_key_known_value() {
        // sha256("user@example.com")
        assert_eq!(
            search_key("user@example.com"),
            "b4c9a289323b21a01c3e940f150eb9b8c542587f1abfd8f0e1cc1ffc5e475514"
        );
    }
}
