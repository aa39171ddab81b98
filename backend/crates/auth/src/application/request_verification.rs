//! Request Verification Use Case
//!
//! Generates a fresh one-time code for an unverified account and hands
//! it to the notifier. The email is stored at rest only as a slow hash,
//! so the caller supplies the delivery address; it is accepted only if
//! its deterministic search key matches the account's, which proves the
//! address without reversing the hash.
//!
//! The code is persisted before delivery is attempted: a failed send
//! leaves a usable pending code, and a re-send simply rotates it.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::AccountId;
use crate::domain::repository::{AccountRepository, CodeNotifier};
use crate::domain::value_object::{email::Email, verification_code::VerificationCode};
use crate::error::{AuthError, AuthResult};

/// Verification request input
#[derive(Debug)]
pub struct RequestVerificationInput {
    /// Authenticated account requesting the code
    pub account_id: AccountId,
    /// Delivery address; must match the account's search key
    pub email: String,
}

/// Request verification use case
pub struct RequestVerificationUseCase<R: AccountRepository, N: CodeNotifier> {
    repository: Arc<R>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
}

impl<R: AccountRepository, N: CodeNotifier> RequestVerificationUseCase<R, N> {
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: Arc<AuthConfig>) -> Self {
        Self {
            repository,
            notifier,
            config,
        }
    }

    pub async fn execute(&self, input: RequestVerificationInput) -> AuthResult<()> {
        let mut account = self
            .repository
            .find_by_id(&input.account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.can_request_code() {
            return Err(AuthError::AlreadyVerified);
        }

        let email = Email::new(input.email)?;
        if email.search_key() != account.email_search_key {
            return Err(AuthError::InvalidEmail(
                "address does not belong to this account".to_string(),
            ));
        }

        let code = VerificationCode::generate(self.config.code_length);
        account.set_pending_code(code.clone());
        self.repository.update(&account).await?;

        self.notifier.deliver(&email, &code).await?;

        tracing::info!(account_id = %account.account_id, "Verification code sent");
        Ok(())
    }
}
