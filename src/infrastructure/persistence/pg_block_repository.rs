//! PostgreSQL implementation of blocklist lookups.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::repositories::BlockRepository;
use crate::error::AppError;

use super::bounded;

/// PostgreSQL repository answering blocklist membership questions.
///
/// Entries are written by the `admin` binary; this side only reads.
pub struct PgBlockRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgBlockRepository {
    /// Creates a new repository with a connection pool and store deadline.
    pub fn new(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl BlockRepository for PgBlockRepository {
    async fn is_domain_blocked(&self, domain: &str) -> Result<bool, AppError> {
        bounded(self.timeout, "block.is_domain_blocked", async {
            let blocked = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM blocked_domains WHERE domain = $1)",
            )
            .bind(domain)
            .fetch_one(self.pool.as_ref())
            .await?;

            Ok(blocked)
        })
        .await
    }

    async fn is_user_blocked(&self, user_id: Uuid) -> Result<bool, AppError> {
        bounded(self.timeout, "block.is_user_blocked", async {
            let blocked = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM blocked_users WHERE user_id = $1)",
            )
            .bind(user_id)
            .fetch_one(self.pool.as_ref())
            .await?;

            Ok(blocked)
        })
        .await
    }
}
