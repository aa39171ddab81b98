//! Use case tests with in-memory infrastructure

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::application::{
    ConfirmVerificationInput, ConfirmVerificationUseCase, LoginInput, LoginUseCase, RegisterInput,
    RegisterUseCase, RequestVerificationInput, RequestVerificationUseCase,
};
use crate::domain::entity::account::{Account, AccountId};
use crate::domain::repository::{AccountRepository, CodeNotifier};
use crate::domain::value_object::{email::Email, verification_code::VerificationCode};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory test doubles
// ============================================================================

#[derive(Clone, Default)]
struct MemoryAccountRepository {
    accounts: Arc<Mutex<HashMap<Uuid, Account>>>,
}

impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|a| a.email_search_key == account.email_search_key)
        {
            return Err(AuthError::DuplicateAccount);
        }
        accounts.insert(*account.account_id.as_uuid(), account.clone());
        Ok(())
    }

    async fn find_by_search_key(&self, search_key: &str) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.email_search_key == search_key)
            .cloned())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(account_id.as_uuid()).cloned())
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        accounts.insert(*account.account_id.as_uuid(), account.clone());
        Ok(())
    }
}

/// Simulates losing a registration race: the pre-check sees no account,
/// but the unique index rejects the insert.
#[derive(Clone, Default)]
struct ConflictingInsertRepository;

impl AccountRepository for ConflictingInsertRepository {
    async fn insert(&self, _account: &Account) -> AuthResult<()> {
        Err(AuthError::DuplicateAccount)
    }

    async fn find_by_search_key(&self, _search_key: &str) -> AuthResult<Option<Account>> {
        Ok(None)
    }

    async fn find_by_id(&self, _account_id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(None)
    }

    async fn update(&self, _account: &Account) -> AuthResult<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    deliveries: Arc<Mutex<Vec<(Email, VerificationCode)>>>,
}

impl RecordingNotifier {
    fn last_code(&self) -> Option<VerificationCode> {
        self.deliveries
            .lock()
            .unwrap()
            .last()
            .map(|(_, code)| code.clone())
    }

    fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }
}

impl CodeNotifier for RecordingNotifier {
    async fn deliver(&self, email: &Email, code: &VerificationCode) -> AuthResult<()> {
        self.deliveries
            .lock()
            .unwrap()
            .push((email.clone(), code.clone()));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct FailingNotifier;

impl CodeNotifier for FailingNotifier {
    async fn deliver(&self, _email: &Email, _code: &VerificationCode) -> AuthResult<()> {
        Err(AuthError::EmailDeliveryFailed)
    }
}

// ============================================================================
// Test fixture
// ============================================================================

struct Fixture {
    repo: Arc<MemoryAccountRepository>,
    notifier: Arc<RecordingNotifier>,
    config: Arc<AuthConfig>,
    tokens: TokenService,
}

impl Fixture {
    fn new() -> Self {
        let config = Arc::new(AuthConfig::with_random_secrets());
        Self {
            repo: Arc::new(MemoryAccountRepository::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            tokens: TokenService::new(config.clone()),
            config,
        }
    }

    async fn register(&self, email: &str, password: &str) -> AuthResult<AccountId> {
        let use_case = RegisterUseCase::new(self.repo.clone(), self.config.clone());
        let output = use_case
            .execute(RegisterInput {
                display_name: "someone".to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(output.account_id.parse().unwrap())
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult<crate::application::LoginOutput> {
        let use_case = LoginUseCase::new(self.repo.clone(), self.tokens.clone(), self.config.clone());
        use_case
            .execute(LoginInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn request_code(&self, account_id: AccountId, email: &str) -> AuthResult<()> {
        let use_case = RequestVerificationUseCase::new(
            self.repo.clone(),
            self.notifier.clone(),
            self.config.clone(),
        );
        use_case
            .execute(RequestVerificationInput {
                account_id,
                email: email.to_string(),
            })
            .await
    }

    async fn confirm(&self, account_id: AccountId, code: &str) -> AuthResult<()> {
        let use_case = ConfirmVerificationUseCase::new(self.repo.clone());
        use_case
            .execute(ConfirmVerificationInput {
                account_id,
                code: code.to_string(),
            })
            .await
    }

    async fn account(&self, account_id: AccountId) -> Account {
        self.repo.find_by_id(&account_id).await.unwrap().unwrap()
    }
}

// ============================================================================
// Registration
// ============================================================================

mod register_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_creates_unverified_account() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        let account = fx.account(id).await;
        assert!(account.active);
        assert!(!account.verified);
        assert!(account.pending_code.is_none());
        assert_eq!(account.email_search_key.len(), 64);
        // The clear address never lands in storage
        assert_ne!(account.email_hash.as_phc_string(), "user@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let fx = Fixture::new();
        fx.register("user@example.com", "secret123").await.unwrap();

        let err = fx
            .register("user@example.com", "other-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_duplicate_detection_is_case_insensitive() {
        let fx = Fixture::new();
        fx.register("user@example.com", "secret123").await.unwrap();

        let err = fx
            .register("  USER@Example.COM ", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_lost_registration_race_fails_closed() {
        // The search-key pre-check misses, the unique index still wins
        let fx = Fixture::new();
        let use_case =
            RegisterUseCase::new(Arc::new(ConflictingInsertRepository), fx.config.clone());

        let err = use_case
            .execute(RegisterInput {
                display_name: "someone".to_string(),
                email: "user@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected() {
        let fx = Fixture::new();

        assert!(matches!(
            fx.register("not-an-email", "secret123").await.unwrap_err(),
            AuthError::InvalidEmail(_)
        ));
        assert!(matches!(
            fx.register("user@example.com", "abc").await.unwrap_err(),
            AuthError::PasswordPolicy(_)
        ));
        assert!(matches!(
            fx.register("user@example.com", "").await.unwrap_err(),
            AuthError::MissingFields
        ));

        let use_case = RegisterUseCase::new(fx.repo.clone(), fx.config.clone());
        let err = use_case
            .execute(RegisterInput {
                display_name: "  ".to_string(),
                email: "user@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));
    }
}

// ============================================================================
// Login
// ============================================================================

mod login_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_returns_valid_token_pair() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        let output = fx.login("user@example.com", "secret123").await.unwrap();

        let subject = id.to_string();
        assert_eq!(fx.tokens.verify_access(&output.access_token).unwrap(), subject);
        assert_eq!(
            fx.tokens.verify_refresh(&output.refresh_token).unwrap(),
            subject
        );
    }

    #[tokio::test]
    async fn test_login_normalizes_email() {
        let fx = Fixture::new();
        fx.register("user@example.com", "secret123").await.unwrap();

        assert!(fx.login(" USER@Example.COM ", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_does_not_require_verification() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();
        assert!(!fx.account(id).await.verified);

        assert!(fx.login("user@example.com", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let fx = Fixture::new();
        fx.register("user@example.com", "secret123").await.unwrap();

        let err = fx.login("user@example.com", "wrong456").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_account_rejected() {
        let fx = Fixture::new();
        let err = fx.login("nobody@example.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_inactive_account_rejected() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        let mut account = fx.account(id).await;
        account.active = false;
        fx.repo.update(&account).await.unwrap();

        let err = fx.login("user@example.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AuthError::AccountInactive));
    }
}

// ============================================================================
// Verification code request
// ============================================================================

mod request_code_tests {
    use super::*;

    #[tokio::test]
    async fn test_code_generated_persisted_and_delivered() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        fx.request_code(id, "user@example.com").await.unwrap();

        let delivered = fx.notifier.last_code().unwrap();
        assert_eq!(delivered.as_str().len(), fx.config.code_length);

        let account = fx.account(id).await;
        assert!(account.pending_code.unwrap().matches(&delivered));
    }

    #[tokio::test]
    async fn test_resend_rotates_pending_code() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        fx.request_code(id, "user@example.com").await.unwrap();
        let first = fx.notifier.last_code().unwrap();

        fx.request_code(id, "user@example.com").await.unwrap();
        let second = fx.notifier.last_code().unwrap();
        assert_eq!(fx.notifier.delivery_count(), 2);

        // Only the latest code is accepted
        let account = fx.account(id).await;
        let pending = account.pending_code.unwrap();
        assert!(pending.matches(&second));
        if !first.matches(&second) {
            assert!(!pending.matches(&first));
        }
    }

    #[tokio::test]
    async fn test_mismatched_address_rejected() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        let err = fx.request_code(id, "other@example.com").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
        assert_eq!(fx.notifier.delivery_count(), 0);
    }

    #[tokio::test]
    async fn test_verified_account_cannot_request() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        fx.request_code(id, "user@example.com").await.unwrap();
        let code = fx.notifier.last_code().unwrap();
        fx.confirm(id, code.as_str()).await.unwrap();

        let err = fx.request_code(id, "user@example.com").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyVerified));
    }

    #[tokio::test]
    async fn test_unknown_account_rejected() {
        let fx = Fixture::new();
        let err = fx
            .request_code(AccountId::new(), "user@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_delivery_failure_surfaces_but_keeps_code() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        let use_case = RequestVerificationUseCase::new(
            fx.repo.clone(),
            Arc::new(FailingNotifier),
            fx.config.clone(),
        );
        let err = use_case
            .execute(RequestVerificationInput {
                account_id: id,
                email: "user@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailDeliveryFailed));

        // The code was persisted before the send; a retry stays possible
        let account = fx.account(id).await;
        assert!(account.pending_code.is_some());
        assert!(!account.verified);
    }
}

// ============================================================================
// Verification confirmation
// ============================================================================

mod confirm_tests {
    use super::*;

    #[tokio::test]
    async fn test_correct_code_verifies_and_consumes() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        fx.request_code(id, "user@example.com").await.unwrap();
        let code = fx.notifier.last_code().unwrap();

        fx.confirm(id, code.as_str()).await.unwrap();

        let account = fx.account(id).await;
        assert!(account.verified);
        assert!(account.pending_code.is_none());

        // Replay of the consumed code fails
        let err = fx.confirm(id, code.as_str()).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCode));
    }

    #[tokio::test]
    async fn test_wrong_code_keeps_pending_for_retry() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        fx.request_code(id, "user@example.com").await.unwrap();
        let code = fx.notifier.last_code().unwrap();

        let wrong = if code.as_str() == "000000" { "111111" } else { "000000" };
        let err = fx.confirm(id, wrong).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCode));

        let account = fx.account(id).await;
        assert!(!account.verified);
        assert!(account.pending_code.is_some());

        // Retry with the real code succeeds
        fx.confirm(id, code.as_str()).await.unwrap();
        assert!(fx.account(id).await.verified);
    }

    #[tokio::test]
    async fn test_confirm_without_pending_code_fails() {
        let fx = Fixture::new();
        let id = fx.register("user@example.com", "secret123").await.unwrap();

        let err = fx.confirm(id, "123456").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCode));
    }

    #[tokio::test]
    async fn test_oversized_code_rejected_before_lookup() {
        let fx = Fixture::new();

        // Unknown account: the length guard must fire first
        let err = fx
            .confirm(AccountId::new(), "12345678901")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CodeTooLong));
    }
}
