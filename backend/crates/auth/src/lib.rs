//! Auth (Account Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and the token service
//! - `infra/` - Database and SMTP implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Account registration and login with email + password
//! - Stateless JWT access/refresh token pairs (distinct secrets)
//! - Email verification with a short-lived one-time code
//!
//! ## Security Model
//! - Passwords and the email-at-rest value hashed with Argon2id
//! - Deterministic SHA-256 search key as the unique account index
//! - Duplicate registration enforced by a database unique constraint
//! - Token expiry is the only invalidation mechanism (no revocation)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::TokenService;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAccountRepository;
pub use infra::smtp::{SmtpCodeNotifier, SmtpConfig};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
