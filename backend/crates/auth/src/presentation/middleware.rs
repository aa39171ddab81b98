//! Auth Middleware
//!
//! Bearer-token authentication for protected routes. The access token
//! is verified statelessly; handlers that need the full account load it
//! from the repository using the subject stored in request extensions.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::str::FromStr;

use crate::application::token::TokenService;
use crate::domain::entity::account::AccountId;
use crate::error::AuthError;

/// Authenticated subject stored in request extensions
#[derive(Debug, Clone, Copy)]
pub struct CurrentAccount {
    pub account_id: AccountId,
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware that requires a valid access token
pub async fn require_account(
    State(tokens): State<TokenService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(&req).ok_or_else(|| AuthError::InvalidToken.into_response())?;

    let subject = tokens
        .verify_access(token)
        .map_err(|e| e.into_response())?;

    let account_id = AccountId::from_str(&subject)
        .map_err(|_| AuthError::InvalidToken.into_response())?;

    req.extensions_mut().insert(CurrentAccount { account_id });

    Ok(next.run(req).await)
}
