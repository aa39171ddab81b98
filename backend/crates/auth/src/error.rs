//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Domain code returns these typed
//! outcomes; the presentation layer converts them to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Required registration fields are missing or empty
    #[error("Fill in all the fields")]
    MissingFields,

    /// Email address failed validation
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Password violates the length policy
    #[error("Password validation failed: {0}")]
    PasswordPolicy(String),

    /// Email address is already registered
    #[error("This email address is already registered")]
    DuplicateAccount,

    /// Account not found
    #[error("Account not found")]
    AccountNotFound,

    /// Invalid credentials (wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account is deactivated
    #[error("Account is deactivated")]
    AccountInactive,

    /// Token signature invalid or payload malformed
    #[error("Invalid token")]
    InvalidToken,

    /// Token has expired
    #[error("Token expired")]
    ExpiredToken,

    /// Submitted verification code exceeds the accepted length
    #[error("Verification code is too long")]
    CodeTooLong,

    /// Submitted verification code does not match the pending code
    #[error("Invalid verification code")]
    InvalidCode,

    /// Account is already verified; no code can be requested
    #[error("Account is already verified")]
    AlreadyVerified,

    /// Verification email could not be delivered
    #[error("Could not send the verification code")]
    EmailDeliveryFailed,

    /// Email transport credentials are not configured
    #[error("Email service is not configured")]
    ServiceMisconfigured,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingFields
            | AuthError::InvalidEmail(_)
            | AuthError::PasswordPolicy(_)
            | AuthError::CodeTooLong => StatusCode::BAD_REQUEST,
            AuthError::DuplicateAccount | AuthError::AlreadyVerified => StatusCode::CONFLICT,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::InvalidCode => StatusCode::UNAUTHORIZED,
            AuthError::AccountInactive => StatusCode::FORBIDDEN,
            AuthError::ServiceMisconfigured => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::EmailDeliveryFailed
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingFields
            | AuthError::InvalidEmail(_)
            | AuthError::PasswordPolicy(_)
            | AuthError::CodeTooLong => ErrorKind::BadRequest,
            AuthError::DuplicateAccount | AuthError::AlreadyVerified => ErrorKind::Conflict,
            AuthError::AccountNotFound => ErrorKind::NotFound,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::InvalidCode => ErrorKind::Unauthorized,
            AuthError::AccountInactive => ErrorKind::Forbidden,
            AuthError::ServiceMisconfigured => ErrorKind::ServiceUnavailable,
            AuthError::EmailDeliveryFailed
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::EmailDeliveryFailed => {
                tracing::error!("Verification email delivery failed");
            }
            AuthError::ServiceMisconfigured => {
                tracing::error!("Email transport credentials missing");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidCode => {
                tracing::warn!("Invalid verification code submitted");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<platform::jwt::JwtError> for AuthError {
    fn from(_: platform::jwt::JwtError) -> Self {
        AuthError::InvalidToken
    }
}

impl From<platform::password::SecretHashError> for AuthError {
    fn from(err: platform::password::SecretHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::MissingFields.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::CodeTooLong.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::DuplicateAccount.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::AccountNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::ServiceMisconfigured.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kind_classes_match_status() {
        let errors = [
            AuthError::MissingFields,
            AuthError::DuplicateAccount,
            AuthError::AccountNotFound,
            AuthError::InvalidToken,
            AuthError::AccountInactive,
            AuthError::ServiceMisconfigured,
            AuthError::Internal("x".into()),
        ];
        for err in errors {
            assert_eq!(err.status_code().as_u16(), err.kind().status_code());
        }
    }

    #[test]
    fn test_jwt_error_maps_to_invalid_token() {
        let err: AuthError = platform::jwt::JwtError::Malformed.into();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
