//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkUpdate, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for link persistence.
///
/// Links are never physically deleted; the only mutation is the atomic
/// update, which also writes the pre-update history snapshot.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug already exists; callers
    /// retry with a freshly generated slug.
    ///
    /// Returns [`AppError::Internal`] on other database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError>;

    /// Finds a link by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Lists all links created by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError>;

    /// Atomically updates a link and records its pre-update snapshot.
    ///
    /// One transaction: read the current row, apply the patch, insert a
    /// `link_history` row capturing the state before the patch, commit.
    /// Any failure rolls back all three steps; a reader never observes the
    /// new link state without its matching history row, or vice versa.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `id`.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(
        &self,
        id: Uuid,
        updated_by: Uuid,
        patch: LinkUpdate,
    ) -> Result<Link, AppError>;
}
