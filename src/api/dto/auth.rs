//! DTOs for registration and login endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{User, UserSession};

/// Request to register a user with a password.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 100))]
    pub given_name: Option<String>,
    #[validate(length(max = 100))]
    pub family_name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 12, max = 128))]
    pub password: String,
}

/// Request to log in with email and password.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Query parameters on the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
}

/// A user profile as returned by the API.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            given_name: user.given_name,
            family_name: user.family_name,
            email: user.email,
            avatar_url: user.avatar_url,
        }
    }
}

/// An issued session as returned by the login endpoints.
///
/// The token is also set as an `x-session-token` cookie.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<UserSession> for SessionResponse {
    fn from(session: UserSession) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}
