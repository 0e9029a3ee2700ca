//! Handlers for registration and login endpoints.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, OAuthCallbackQuery, RegisterRequest, SessionResponse, UserResponse,
};
use crate::api::middleware::auth_context::{AuthContext, SESSION_TOKEN};
use crate::application::services::RegisterUser;
use crate::error::AppError;
use crate::state::AppState;

/// Builds the session cookie set on successful login.
fn session_cookie(token: &str) -> String {
    format!("{SESSION_TOKEN}={token}; Path=/; HttpOnly; Secure; SameSite=Lax")
}

/// Registers a user with a password credential.
///
/// # Endpoint
///
/// `POST /api/users`
///
/// # Errors
///
/// - `400` - payload validation failed
/// - `409` - email already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .register(RegisterUser {
            given_name: payload.given_name,
            family_name: payload.family_name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Logs a user in with email and password.
///
/// On success the new session token is returned in the body and set as an
/// `x-session-token` cookie; the request's prior session (if any) is
/// revoked.
///
/// # Endpoint
///
/// `POST /api/sessions/password`
///
/// # Errors
///
/// - `401` - unknown email, non-password credential, or wrong password
///   (indistinguishable from each other)
pub async fn login_password_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = state
        .session_service
        .login_with_password(&payload.email, &payload.password, ctx.session_id())
        .await?;

    let cookie = session_cookie(&session.token);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse::from(session)),
    ))
}

/// Completes a Google OAuth login from the provider's callback.
///
/// Exchanges the authorization code through the identity collaborator,
/// creating the user on first login, then issues a session (revoking the
/// request's prior one) and redirects the browser home with the session
/// cookie set.
///
/// # Endpoint
///
/// `GET /callback/google?code=...`
pub async fn login_google_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = query.code.filter(|c| !c.is_empty()).ok_or_else(|| {
        AppError::bad_request("Missing authorization code", json!({ "param": "code" }))
    })?;

    let session = state
        .oauth_service
        .login_with_code(&code, ctx.session_id())
        .await?;

    let cookie = session_cookie(&session.token);

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")))
}
