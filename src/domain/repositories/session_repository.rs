//! Repository trait for session persistence.

use crate::domain::entities::UserSession;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Input for persisting a freshly issued session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Repository interface for session rows.
///
/// Sessions are append-and-flag: rows are inserted on issuance and revoked
/// by setting `expired_by_user`; nothing is ever deleted here.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSessionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_session.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a new session row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] on a token collision (practically
    /// unreachable with 256-bit tokens).
    /// Returns [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_session: NewSession) -> Result<UserSession, AppError>;

    /// Marks a session as revoked by the user.
    ///
    /// Revoking an already-revoked or unknown session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn expire(&self, session_id: Uuid) -> Result<(), AppError>;
}
