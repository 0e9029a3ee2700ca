//! Session issuance, validation, and revocation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{User, UserSession};
use crate::domain::repositories::{NewSession, SessionRepository, UserRepository};
use crate::error::AppError;
use crate::utils::token::generate_session_token;

/// Service owning the session lifecycle.
///
/// This is the sole mutation point that grants authenticated capability:
/// every login path, password or OAuth, funnels through [`Self::issue`].
pub struct SessionService<U: UserRepository, S: SessionRepository> {
    user_repository: Arc<U>,
    session_repository: Arc<S>,
    validity: Duration,
}

impl<U: UserRepository, S: SessionRepository> SessionService<U, S> {
    /// Creates a new session service with the given validity window.
    pub fn new(user_repository: Arc<U>, session_repository: Arc<S>, ttl_days: i64) -> Self {
        Self {
            user_repository,
            session_repository,
            validity: Duration::days(ttl_days),
        }
    }

    /// Issues a fresh session for a user.
    ///
    /// Generates an unguessable token and persists it with
    /// `expires_at = now + validity window`.
    pub async fn create_session(&self, user_id: Uuid) -> Result<UserSession, AppError> {
        self.session_repository
            .insert(NewSession {
                user_id,
                token: generate_session_token(),
                expires_at: Utc::now() + self.validity,
            })
            .await
    }

    /// Issues a session and revokes the caller's prior one, if any.
    ///
    /// Used on every (re-)authentication so at most one session is "the
    /// current session" from the user's point of view, even though older
    /// rows remain in the store.
    pub async fn issue(
        &self,
        user_id: Uuid,
        prior_session: Option<Uuid>,
    ) -> Result<UserSession, AppError> {
        let session = self.create_session(user_id).await?;

        if let Some(prior) = prior_session {
            self.expire(prior).await?;
        }

        Ok(session)
    }

    /// Resolves a presented token to its user and session.
    ///
    /// Returns `Ok(None)` (anonymous) when the token is unknown or the
    /// session fails the expiry invariant. Expiry is evaluated here, at
    /// validation time; the store returns lazily-expired rows unfiltered.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failure.
    pub async fn validate(&self, token: &str) -> Result<Option<(User, UserSession)>, AppError> {
        if token.is_empty() {
            return Ok(None);
        }

        match self.user_repository.find_by_session_token(token).await? {
            Some((user, session)) => {
                if session.is_expired() {
                    tracing::debug!(session_id = %session.id, "expired session presented");
                    return Ok(None);
                }
                Ok(Some((user, session)))
            }
            None => Ok(None),
        }
    }

    /// Revokes a session explicitly.
    pub async fn expire(&self, session_id: Uuid) -> Result<(), AppError> {
        self.session_repository.expire(session_id).await
    }

    /// Authenticates a user by email and password, issuing a session.
    ///
    /// The prior session (from the request's auth context) is revoked after
    /// the new session is created, before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] for an unknown email, a
    /// non-password credential, or a password mismatch; the three are
    /// outwardly identical.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
        prior_session: Option<Uuid>,
    ) -> Result<UserSession, AppError> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                AppError::unauthenticated(
                    "Invalid credentials",
                    json!({ "reason": "unknown email" }),
                )
            })?;

        user.verify_password(password)?;

        self.issue(user.id, prior_session).await
    }
}
