//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! runtime-bound queries mapped through `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and the atomic update+history write
//! - [`PgBlockRepository`] - Blocklist membership lookups
//! - [`PgUserRepository`] - Users, credentials, and token resolution
//! - [`PgSessionRepository`] - Session issuance and revocation
//!
//! # Store deadline
//!
//! Every operation is wrapped in [`bounded`], a fixed per-operation deadline
//! (default 10 s, from `STORE_TIMEOUT_SECONDS`) that is independent of the
//! caller's own cancellation. On deadline the in-flight future is dropped,
//! which aborts the query and returns its connection to the pool.

use serde_json::json;
use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

pub mod pg_block_repository;
pub mod pg_link_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;

pub use pg_block_repository::PgBlockRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;

/// Runs a store operation under a fixed deadline.
///
/// A timed-out operation surfaces as [`AppError::Internal`]; the caller never
/// learns more than "infrastructure failure", while the log line carries the
/// operation name for diagnosis.
pub(crate) async fn bounded<T, F>(
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "store operation exceeded deadline"
            );
            Err(AppError::internal("Store operation timed out", json!({})))
        }
    }
}
