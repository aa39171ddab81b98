//! Value Object Module

pub mod account_password;
pub mod email;
pub mod verification_code;
