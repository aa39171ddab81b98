//! Register Use Case
//!
//! Creates a new unverified account. The email is normalized once and
//! then split into its two at-rest forms: the deterministic search key
//! (lookups, unique index) and the slow hash (at-rest protection).

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::{PasswordDigest, RawPassword},
    email::Email,
};
use crate::error::{AuthError, AuthResult};

/// Registration input
#[derive(Debug)]
pub struct RegisterInput {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Registration output (public account profile)
#[derive(Debug, Clone)]
pub struct RegisterOutput {
    pub account_id: String,
    pub display_name: String,
    pub email: String,
    pub active: bool,
    pub verified: bool,
}

/// Register use case
pub struct RegisterUseCase<R: AccountRepository> {
    repository: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: AccountRepository> RegisterUseCase<R> {
    pub fn new(repository: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repository, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let display_name = input.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let email = Email::new(input.email)?;
        let password = RawPassword::new(input.password)?;

        // Fast-path existence check; the unique index on the search key
        // remains the authoritative guard inside insert().
        if self
            .repository
            .find_by_search_key(&email.search_key())
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateAccount);
        }

        let email_hash = platform::password::ClearSecret::new(email.as_str()).hash(None)?;
        let password_hash = PasswordDigest::from_raw(&password, self.config.pepper())?;

        let account = Account::new(display_name, &email, email_hash, password_hash);
        self.repository.insert(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            "Account registered"
        );

        Ok(RegisterOutput {
            account_id: account.account_id.to_string(),
            display_name: account.display_name,
            email: email.as_str().to_string(),
            active: account.active,
            verified: account.verified,
        })
    }
}
