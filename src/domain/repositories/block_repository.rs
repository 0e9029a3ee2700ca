//! Repository trait for blocklist lookups.

use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Read-only interface over the administrator-maintained blocklist.
///
/// Entries are managed outside this service (see the `admin` binary); the
/// serving path only ever asks membership questions. An absent row is a
/// normal `false`, never an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgBlockRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// Whether a destination domain is blocked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors. Redirect-path
    /// callers must treat that as blocked (fail closed).
    async fn is_domain_blocked(&self, domain: &str) -> Result<bool, AppError>;

    /// Whether a user is blocked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn is_user_blocked(&self, user_id: Uuid) -> Result<bool, AppError>;
}
