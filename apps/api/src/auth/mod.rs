//! Session identity. Credentials are handled entirely by the external auth
//! provider; this module only maps its session token to an opaque user id.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Session cookies the auth provider sets, secure variant first.
pub const SESSION_COOKIES: [&str; 2] = [
    "__Secure-next-auth.session-token",
    "next-auth.session-token",
];

/// The signed-in user making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
}

/// Reads the session token from the provider cookie, falling back to a
/// bearer `Authorization` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    SESSION_COOKIES
        .iter()
        .find_map(|name| {
            jar.get(name)
                .map(|c| c.value().trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .or_else(|| bearer_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for SessionIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            warn!(path = %parts.uri.path(), "Request without session token");
            return Err(AppError::Unauthenticated);
        };

        match state.sessions.resolve(&token).await? {
            Some(user_id) => Ok(SessionIdentity { user_id }),
            None => {
                warn!(path = %parts.uri.path(), "Unknown or expired session token");
                Err(AppError::Unauthenticated)
            }
        }
    }
}
