//! HTTP Handlers

use axum::extract::State;
use axum::{Extension, Json};
use std::str::FromStr;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::application::{
    ConfirmVerificationInput, ConfirmVerificationUseCase, LoginInput, LoginUseCase, RegisterInput,
    RegisterUseCase, RequestVerificationInput, RequestVerificationUseCase,
};
use crate::domain::entity::account::AccountId;
use crate::domain::repository::{AccountRepository, CodeNotifier};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccountInfoResponse, AckResponse, ConfirmRequest, LoginRequest, LoginResponse,
    RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse, SendCodeRequest,
};
use crate::presentation::middleware::CurrentAccount;

/// Shared state for auth handlers
pub struct AuthAppState<R, N>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
    pub config: Arc<AuthConfig>,
    pub tokens: TokenService,
}

impl<R, N> Clone for AuthAppState<R, N>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Json<RegisterResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        display_name: req.display_name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(RegisterResponse {
        account_id: output.account_id,
        display_name: output.display_name,
        email: output.email,
        active: output.active,
        verified: output.verified,
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        account_id: output.account_id,
        display_name: output.display_name,
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

// ============================================================================
// Token Refresh
// ============================================================================

/// POST /api/auth/refresh
///
/// A valid refresh token yields a fresh pair. The account must still
/// exist and be active; deactivation cuts off refresh immediately.
pub async fn refresh<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<RefreshResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    let subject = state.tokens.verify_refresh(&req.refresh_token)?;
    let account_id = AccountId::from_str(&subject).map_err(|_| AuthError::InvalidToken)?;

    let account = state
        .repo
        .find_by_id(&account_id)
        .await?
        .ok_or(AuthError::AccountNotFound)?;

    if !account.can_login() {
        return Err(AuthError::AccountInactive);
    }

    Ok(Json(RefreshResponse {
        access_token: state.tokens.issue_access(&subject)?,
        refresh_token: state.tokens.issue_refresh(&subject)?,
    }))
}

// ============================================================================
// Email Verification
// ============================================================================

/// POST /api/auth/send-verification-code (requires authentication)
pub async fn send_verification_code<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Extension(current): Extension<CurrentAccount>,
    Json(req): Json<SendCodeRequest>,
) -> AuthResult<Json<AckResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    let use_case = RequestVerificationUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let input = RequestVerificationInput {
        account_id: current.account_id,
        email: req.email,
    };

    use_case.execute(input).await?;

    Ok(Json(AckResponse {
        detail: "Verification code sent".to_string(),
    }))
}

/// POST /api/auth/confirm-account (requires authentication)
pub async fn confirm_account<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Extension(current): Extension<CurrentAccount>,
    Json(req): Json<ConfirmRequest>,
) -> AuthResult<Json<AckResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    let use_case = ConfirmVerificationUseCase::new(state.repo.clone());

    let input = ConfirmVerificationInput {
        account_id: current.account_id,
        code: req.code,
    };

    use_case.execute(input).await?;

    Ok(Json(AckResponse {
        detail: "Account verified".to_string(),
    }))
}

// ============================================================================
// Current Account
// ============================================================================

/// GET /api/auth/me (requires authentication)
pub async fn account_info<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Extension(current): Extension<CurrentAccount>,
) -> AuthResult<Json<AccountInfoResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    let account = state
        .repo
        .find_by_id(&current.account_id)
        .await?
        .ok_or(AuthError::AccountNotFound)?;

    Ok(Json(AccountInfoResponse {
        account_id: account.account_id.to_string(),
        display_name: account.display_name,
        photo: account.photo,
        active: account.active,
        verified: account.verified,
    }))
}
