//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkUpdate, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

use super::bounded;

const LINK_COLUMNS: &str =
    "id, slug, destination_url, created_by, updated_by, active, quarantined, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    slug: String,
    destination_url: String,
    created_by: Uuid,
    updated_by: Uuid,
    active: bool,
    quarantined: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            slug: row.slug,
            destination_url: row.destination_url,
            created_by: row.created_by,
            updated_by: row.updated_by,
            active: row.active,
            quarantined: row.quarantined,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for link storage and the atomic update+history write.
///
/// Every operation runs under a fixed deadline independent of the caller's
/// own cancellation, so a slow query cannot hold a pool connection
/// indefinitely.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgLinkRepository {
    /// Creates a new repository with a connection pool and store deadline.
    pub fn new(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        bounded(self.timeout, "link.create", async {
            let row = sqlx::query_as::<_, LinkRow>(&format!(
                r#"
                INSERT INTO links (slug, destination_url, created_by, updated_by)
                VALUES ($1, $2, $3, $3)
                RETURNING {LINK_COLUMNS}
                "#
            ))
            .bind(&new_link.slug)
            .bind(&new_link.destination_url)
            .bind(new_link.created_by)
            .fetch_one(self.pool.as_ref())
            .await?;

            Ok(row.into())
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError> {
        bounded(self.timeout, "link.find_by_id", async {
            let row = sqlx::query_as::<_, LinkRow>(&format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(Link::from))
        })
        .await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        bounded(self.timeout, "link.find_by_slug", async {
            let row = sqlx::query_as::<_, LinkRow>(&format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE slug = $1"
            ))
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(Link::from))
        })
        .await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        bounded(self.timeout, "link.list_by_owner", async {
            let rows = sqlx::query_as::<_, LinkRow>(&format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE created_by = $1 ORDER BY created_at DESC"
            ))
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

            Ok(rows.into_iter().map(Link::from).collect())
        })
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        updated_by: Uuid,
        patch: LinkUpdate,
    ) -> Result<Link, AppError> {
        // Read, patch, and snapshot happen inside one transaction; dropping
        // the future on deadline rolls all three back.
        bounded(self.timeout, "link.update", async {
            let mut tx = self.pool.begin().await?;

            let prev = sqlx::query_as::<_, LinkRow>(&format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE id = $1 FOR UPDATE"
            ))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

            let updated = sqlx::query_as::<_, LinkRow>(&format!(
                r#"
                UPDATE links
                SET destination_url = COALESCE($2::text, destination_url),
                    active = COALESCE($3::boolean, active),
                    updated_by = $4,
                    updated_at = now()
                WHERE id = $1
                RETURNING {LINK_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(patch.destination_url.as_deref())
            .bind(patch.active)
            .bind(updated_by)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO link_history
                    (link_id, destination_url, active, quarantined, created_by, updated_by)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(prev.id)
            .bind(&prev.destination_url)
            .bind(prev.active)
            .bind(prev.quarantined)
            .bind(prev.created_by)
            .bind(updated_by)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            Ok(updated.into())
        })
        .await
    }
}
