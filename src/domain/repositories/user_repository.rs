//! Repository trait for user and credential data access.

use crate::domain::entities::{User, UserSession};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// Input for registering a user with a password credential.
///
/// `password_hash` is an Argon2 PHC string; hashing happens in the
/// application layer, never in storage code.
#[derive(Debug, Clone)]
pub struct NewPasswordUser {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

/// Input for creating a user from an external identity provider.
#[derive(Debug, Clone)]
pub struct NewOAuthUser {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
    /// Opaque token material from the provider.
    pub value: String,
    pub provider: String,
    pub provider_id: String,
    pub provider_data: Value,
}

/// Repository interface for users and their credentials.
///
/// User + credential creation is transactional: either both rows land or
/// neither does.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_user.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user (with credential) by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Finds a user (with credential) by email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Finds a user by external provider identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_provider_id(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<User>, AppError>;

    /// Resolves a presented session token to its user and session row.
    ///
    /// Returns the row even when the session is expired; expiry is
    /// evaluated by the caller at validation time, not filtered here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_session_token(
        &self,
        token: &str,
    ) -> Result<Option<(User, UserSession)>, AppError>;

    /// Registers a user with a password credential, transactionally.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on other database errors.
    async fn create_password_user(&self, args: NewPasswordUser) -> Result<User, AppError>;

    /// Creates a user from an external identity, transactionally.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on other database errors.
    async fn create_oauth_user(&self, args: NewOAuthUser) -> Result<User, AppError>;
}
