//! PostgreSQL implementation of session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::UserSession;
use crate::domain::repositories::{NewSession, SessionRepository};
use crate::error::AppError;

use super::bounded;

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    token: String,
    expires_at: DateTime<Utc>,
    expired_by_user: bool,
}

impl From<SessionRow> for UserSession {
    fn from(row: SessionRow) -> Self {
        UserSession {
            id: row.id,
            user_id: row.user_id,
            token: row.token,
            expires_at: row.expires_at,
            expired_by_user: row.expired_by_user,
        }
    }
}

/// PostgreSQL repository for session rows.
pub struct PgSessionRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgSessionRepository {
    /// Creates a new repository with a connection pool and store deadline.
    pub fn new(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, new_session: NewSession) -> Result<UserSession, AppError> {
        bounded(self.timeout, "session.insert", async {
            let row = sqlx::query_as::<_, SessionRow>(
                r#"
                INSERT INTO user_sessions (user_id, token, expires_at)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, token, expires_at, expired_by_user
                "#,
            )
            .bind(new_session.user_id)
            .bind(&new_session.token)
            .bind(new_session.expires_at)
            .fetch_one(self.pool.as_ref())
            .await?;

            Ok(row.into())
        })
        .await
    }

    async fn expire(&self, session_id: Uuid) -> Result<(), AppError> {
        bounded(self.timeout, "session.expire", async {
            sqlx::query(
                r#"
                UPDATE user_sessions
                SET expired_by_user = TRUE
                WHERE id = $1 AND expired_by_user = FALSE
                "#,
            )
            .bind(session_id)
            .execute(self.pool.as_ref())
            .await?;

            Ok(())
        })
        .await
    }
}
