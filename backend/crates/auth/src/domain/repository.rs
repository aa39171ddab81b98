//! Repository Traits
//!
//! Interfaces for persistence and code delivery. Implementations live
//! in the infrastructure layer.

use crate::domain::entity::account::{Account, AccountId};
use crate::domain::value_object::{email::Email, verification_code::VerificationCode};
use crate::error::AuthResult;

/// Account repository trait
///
/// The existence pre-check via [`Self::find_by_search_key`] is an
/// optimization only; the unique index on the search-key column is the
/// authoritative duplicate guard and [`Self::insert`] must surface a
/// violation as `AuthError::DuplicateAccount`.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account; fails with `DuplicateAccount` when the
    /// search key is already taken.
    async fn insert(&self, account: &Account) -> AuthResult<()>;

    /// Find account by its email search key
    async fn find_by_search_key(&self, search_key: &str) -> AuthResult<Option<Account>>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Persist the current state of an account (full-row write)
    async fn update(&self, account: &Account) -> AuthResult<()>;
}

/// Verification code delivery trait
///
/// Transport failures are reported, never retried here.
#[trait_variant::make(CodeNotifier: Send)]
pub trait LocalCodeNotifier {
    /// Deliver a verification code to the given address
    async fn deliver(&self, email: &Email, code: &VerificationCode) -> AuthResult<()>;
}
