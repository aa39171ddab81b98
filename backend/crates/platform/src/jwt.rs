//! Minimal HS256 compact JWT codec
//!
//! Produces/consumes the standard three-segment form
//! `base64url(header).base64url(claims).base64url(signature)` with
//! padding-free base64url and HMAC-SHA256 signatures.
//!
//! Notes:
//! - Only JSON object claims are supported.
//! - Signature verification uses `Hmac::verify_slice`.
//! - `decode_hs256` validates signature and shape but NOT `exp`;
//!   expiry policy belongs to the caller.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use thiserror::Error;

/// JWT encode/decode errors
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token is not three dot-separated base64url segments
    #[error("Malformed token")]
    Malformed,

    /// Header is not an HS256 JWT header
    #[error("Unsupported token header")]
    UnsupportedHeader,

    /// HMAC signature does not match
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Header or claims JSON failed to (de)serialize
    #[error("Token payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// HMAC key rejected
    #[error("Invalid signing key")]
    InvalidKey,
}

#[derive(Debug, Serialize, serde::Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
}

fn b64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

fn b64url_decode(s: &str) -> Result<Vec<u8>, JwtError> {
    URL_SAFE_NO_PAD.decode(s.as_bytes()).map_err(|_| JwtError::Malformed)
}

/// Encode claims as an HS256-signed compact JWT.
pub fn encode_hs256<T: Serialize>(secret: &[u8], claims: &T) -> Result<String, JwtError> {
    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };

    let header_b64 = b64url_encode(&serde_json::to_vec(&header)?);
    let claims_b64 = b64url_encode(&serde_json::to_vec(claims)?);
    let signing_input = format!("{header_b64}.{claims_b64}");

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).map_err(|_| JwtError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();
    let sig_b64 = b64url_encode(&signature);

    Ok(format!("{signing_input}.{sig_b64}"))
}

/// Decode an HS256 compact JWT, verifying the signature.
///
/// Does not validate `exp` or any other claim; callers must.
pub fn decode_hs256<T: DeserializeOwned>(secret: &[u8], token: &str) -> Result<T, JwtError> {
    let token = token.trim();
    let mut parts = token.split('.');
    let (Some(header_b64), Some(claims_b64), Some(sig_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(JwtError::Malformed);
    };

    let header_raw = b64url_decode(header_b64)?;
    let header: JwtHeader =
        serde_json::from_slice(&header_raw).map_err(|_| JwtError::Malformed)?;
    if header.alg != "HS256" || !header.typ.eq_ignore_ascii_case("JWT") {
        return Err(JwtError::UnsupportedHeader);
    }

    let signing_input = format!("{header_b64}.{claims_b64}");
    let sig = b64url_decode(sig_b64)?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).map_err(|_| JwtError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&sig).map_err(|_| JwtError::InvalidSignature)?;

    let claims_raw = b64url_decode(claims_b64)?;
    let claims: T = serde_json::from_slice(&claims_raw)?;

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        exp: i64,
    }

    const SECRET: &[u8] = b"test-signing-secret-at-least-32b";

    fn claims() -> TestClaims {
        TestClaims {
            sub: "account-1".to_string(),
            exp: 1_900_000_000,
        }
    }

    #[test]
    fn test_encode_produces_three_segments() {
        let token = encode_hs256(SECRET, &claims()).unwrap();
        assert_eq!(token.split('.').count(), 3);
        // base64url without padding
        assert!(!token.contains('='));
    }

    #[test]
    fn test_roundtrip() {
        let token = encode_hs256(SECRET, &claims()).unwrap();
        let decoded: TestClaims = decode_hs256(SECRET, &token).unwrap();
        assert_eq!(decoded, claims());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode_hs256(SECRET, &claims()).unwrap();
        let result: Result<TestClaims, _> = decode_hs256(b"another-secret", &token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let token = encode_hs256(SECRET, &claims()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"account-2","exp":1900000000}"#);
        parts[1] = &forged;
        let tampered = parts.join(".");
        let result: Result<TestClaims, _> = decode_hs256(SECRET, &tampered);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for bad in ["", "abc", "a.b", "a.b.c.d", "not base64!.x.y"] {
            let result: Result<TestClaims, _> = decode_hs256(SECRET, bad);
            assert!(result.is_err(), "expected failure for {bad:?}");
        }
    }

    #[test]
    fn test_non_hs256_header_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(br#"{"sub":"x","exp":0}"#);
        let token = format!("{header}.{body}.");
        let result: Result<TestClaims, _> = decode_hs256(SECRET, &token);
        assert!(matches!(result, Err(JwtError::UnsupportedHeader)));
    }
}
