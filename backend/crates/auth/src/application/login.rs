//! Login Use Case
//!
//! Verifies credentials against the stored Argon2id digest and issues
//! an access/refresh token pair. Lookup goes through the deterministic
//! email search key; the slow email hash is never used for search.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{account_password::RawPassword, email::Email};
use crate::error::{AuthError, AuthResult};

/// Login input
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub account_id: String,
    pub display_name: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Login use case
pub struct LoginUseCase<R: AccountRepository> {
    repository: Arc<R>,
    tokens: TokenService,
    config: Arc<AuthConfig>,
}

impl<R: AccountRepository> LoginUseCase<R> {
    pub fn new(repository: Arc<R>, tokens: TokenService, config: Arc<AuthConfig>) -> Self {
        Self {
            repository,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // An address that cannot be valid cannot name an account.
        let email = Email::new(input.email).map_err(|_| AuthError::AccountNotFound)?;

        let account = self
            .repository
            .find_by_search_key(&email.search_key())
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.can_login() {
            return Err(AuthError::AccountInactive);
        }

        let password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;
        if !account.password_hash.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let subject = account.account_id.to_string();
        let access_token = self.tokens.issue_access(&subject)?;
        let refresh_token = self.tokens.issue_refresh(&subject)?;

        tracing::info!(account_id = %account.account_id, "Account logged in");

        Ok(LoginOutput {
            account_id: subject,
            display_name: account.display_name,
            access_token,
            refresh_token,
        })
    }
}
