//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::repository::{AccountRepository, CodeNotifier};
use crate::infra::postgres::PgAccountRepository;
use crate::infra::smtp::SmtpCodeNotifier;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_account;

/// Create the Auth router with PostgreSQL repository and SMTP notifier
pub fn auth_router(
    repo: PgAccountRepository,
    notifier: SmtpCodeNotifier,
    config: AuthConfig,
) -> Router {
    auth_router_generic(repo, notifier, config)
}

/// Create a generic Auth router for any repository and notifier
pub fn auth_router_generic<R, N>(repo: R, notifier: N, config: AuthConfig) -> Router
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    N: CodeNotifier + Send + Sync + 'static,
{
    let config = Arc::new(config);
    let tokens = TokenService::new(config.clone());

    let state = AuthAppState {
        repo: Arc::new(repo),
        notifier: Arc::new(notifier),
        config,
        tokens: tokens.clone(),
    };

    let protected = Router::new()
        .route(
            "/send-verification-code",
            post(handlers::send_verification_code::<R, N>),
        )
        .route("/confirm-account", post(handlers::confirm_account::<R, N>))
        .route("/me", get(handlers::account_info::<R, N>))
        .layer(middleware::from_fn_with_state(tokens, require_account));

    Router::new()
        .route("/register", post(handlers::register::<R, N>))
        .route("/login", post(handlers::login::<R, N>))
        .route("/refresh", post(handlers::refresh::<R, N>))
        .merge(protected)
        .with_state(state)
}
