//! Application Layer
//!
//! Use cases and the token service.

pub mod config;
pub mod confirm_verification;
pub mod login;
pub mod register;
pub mod request_verification;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use confirm_verification::{ConfirmVerificationInput, ConfirmVerificationUseCase};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use request_verification::{RequestVerificationInput, RequestVerificationUseCase};
pub use token::{Claims, TokenService};
