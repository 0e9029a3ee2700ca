//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link persistence and the atomic update+history write
//! - [`BlockRepository`] - Read-only blocklist membership checks
//! - [`UserRepository`] - Users, credentials, and token resolution
//! - [`SessionRepository`] - Session issuance and revocation
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod block_repository;
pub mod link_repository;
pub mod session_repository;
pub mod user_repository;

pub use block_repository::BlockRepository;
pub use link_repository::LinkRepository;
pub use session_repository::{NewSession, SessionRepository};
pub use user_repository::{NewOAuthUser, NewPasswordUser, UserRepository};

#[cfg(test)]
pub use block_repository::MockBlockRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
