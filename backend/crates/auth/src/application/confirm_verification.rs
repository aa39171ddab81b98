//! Confirm Verification Use Case
//!
//! Consumes a submitted one-time code. The length guard runs before the
//! account lookup, so oversized submissions never touch the database.

use std::sync::Arc;

use crate::domain::entity::account::AccountId;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::verification_code::VerificationCode;
use crate::error::{AuthError, AuthResult};

/// Confirmation input
#[derive(Debug)]
pub struct ConfirmVerificationInput {
    /// Authenticated account confirming its email
    pub account_id: AccountId,
    /// Submitted code
    pub code: String,
}

/// Confirm verification use case
pub struct ConfirmVerificationUseCase<R: AccountRepository> {
    repository: Arc<R>,
}

impl<R: AccountRepository> ConfirmVerificationUseCase<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, input: ConfirmVerificationInput) -> AuthResult<()> {
        let submitted = VerificationCode::from_submitted(input.code)?;

        let mut account = self
            .repository
            .find_by_id(&input.account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        // Mismatch keeps the pending code so the user can retry.
        account.confirm_code(&submitted)?;
        self.repository.update(&account).await?;

        tracing::info!(account_id = %account.account_id, "Account verified");
        Ok(())
    }
}
