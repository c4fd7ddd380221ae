//! Authentication Middleware
//!
//! Token validation for protected routes and the WebSocket upgrade.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::application::services::AuthError;
use crate::domain::UserIdentity;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Cookie consulted when no `Authorization` header is present.
/// Browsers cannot set headers on a WebSocket upgrade.
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub login: String,
}

impl AuthUser {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.user_id, self.login.clone())
    }
}

impl From<UserIdentity> for AuthUser {
    fn from(user: UserIdentity) -> Self {
        Self {
            user_id: user.id,
            login: user.login,
        }
    }
}

/// Authentication middleware that validates the caller's token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers()).ok_or(AuthError::Missing)?;

    let user = state.authenticator.authenticate(&token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected token");
        e
    })?;

    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

/// Bearer token from the `Authorization` header, falling back to the token cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        return Some(token.trim().to_string());
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}
