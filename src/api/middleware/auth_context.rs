//! Per-request authentication context.
//!
//! Built exactly once per inbound request: the presented session token is
//! resolved through the session service and the result is attached to the
//! request as an [`AuthContext`] extension. Downstream code never touches
//! the token or the session store; it either extracts [`CurrentUser`] (and
//! is rejected with 401 when anonymous) or reads the optional context.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::COOKIE, request::Parts},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{User, UserSession};
use crate::error::AppError;
use crate::state::AppState;

/// Header (and cookie name) carrying the opaque session token.
pub const SESSION_TOKEN: &str = "x-session-token";

/// Resolved identity for one request; empty when anonymous.
#[derive(Clone, Default)]
pub struct AuthContext {
    pub user: Option<User>,
    pub session: Option<UserSession>,
}

impl AuthContext {
    /// The current session id, for revocation on re-authentication.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.id)
    }
}

/// Middleware building the [`AuthContext`] for every request.
///
/// A missing or invalid token yields an anonymous context, never an error;
/// rejection is the concern of the [`CurrentUser`] extractor. A store
/// failure during validation is logged and treated as anonymous, so the
/// public read path stays available.
pub async fn layer(State(st): State<AppState>, mut req: Request, next: Next) -> Response {
    let ctx = match extract_token(req.headers()) {
        Some(token) => match st.session_service.validate(&token).await {
            Ok(Some((user, session))) => AuthContext {
                user: Some(user),
                session: Some(session),
            },
            Ok(None) => AuthContext::default(),
            Err(err) => {
                tracing::error!(error = %err, "session validation failed");
                AuthContext::default()
            }
        },
        None => AuthContext::default(),
    };

    req.extensions_mut().insert(ctx);

    next.run(req).await
}

/// Reads the session token from the `x-session-token` header, falling back
/// to a cookie of the same name.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(SESSION_TOKEN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get(COOKIE)
        .and_then(|cookie_header| cookie_header.to_str().ok())
        .and_then(|cookie_str| {
            cookie_str.split(';').find_map(|cookie| {
                let mut parts = cookie.trim().splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(SESSION_TOKEN), Some(value)) if !value.is_empty() => {
                        Some(value.to_string())
                    }
                    _ => None,
                }
            })
        })
}

/// Extractor yielding the authenticated user, or 401.
///
/// Handlers take this by value; identity is explicit parameter passing, not
/// an ambient lookup.
pub struct CurrentUser {
    pub user: User,
    pub session: UserSession,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_default();

        match (ctx.user, ctx.session) {
            (Some(user), Some(session)) => Ok(CurrentUser { user, session }),
            _ => Err(AppError::unauthenticated(
                "Authentication required",
                json!({}),
            )),
        }
    }
}
