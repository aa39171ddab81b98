//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random codes, constant-time compare)
//! - Slow secret hashing (Argon2id) for passwords and emails at rest
//! - Deterministic email search-key derivation
//! - Minimal HS256 compact JWT codec

pub mod crypto;
pub mod email_index;
pub mod jwt;
pub mod password;
