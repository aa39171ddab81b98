//! Infrastructure Layer
//!
//! PostgreSQL persistence and SMTP code delivery.

pub mod postgres;
pub mod smtp;
