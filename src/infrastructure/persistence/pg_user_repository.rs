//! PostgreSQL implementation of user and credential storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::{PROVIDER_PASSWORD, User, UserAuth, UserSession};
use crate::domain::repositories::{NewOAuthUser, NewPasswordUser, UserRepository};
use crate::error::{AppError, map_sqlx_error};

use super::bounded;

const USER_COLUMNS: &str = "u.id, u.given_name, u.family_name, u.email, u.avatar_url, \
     a.value AS auth_value, a.provider AS auth_provider";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    given_name: Option<String>,
    family_name: Option<String>,
    email: String,
    avatar_url: Option<String>,
    auth_value: Option<String>,
    auth_provider: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let auth = match (row.auth_value, row.auth_provider) {
            (Some(value), Some(provider)) => Some(UserAuth { value, provider }),
            _ => None,
        };

        User::new(
            row.id,
            row.given_name,
            row.family_name,
            row.email,
            row.avatar_url,
            auth,
        )
    }
}

#[derive(sqlx::FromRow)]
struct SessionUserRow {
    id: Uuid,
    given_name: Option<String>,
    family_name: Option<String>,
    email: String,
    avatar_url: Option<String>,
    auth_value: Option<String>,
    auth_provider: Option<String>,
    session_id: Uuid,
    session_user_id: Uuid,
    token: String,
    expires_at: DateTime<Utc>,
    expired_by_user: bool,
}

/// Maps a duplicate-email unique violation to a caller-facing conflict.
fn map_user_insert_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() && db.constraint() == Some("users_email_key") {
            return AppError::conflict(
                "Email already registered",
                json!({ "constraint": "users_email_key" }),
            );
        }
    }
    map_sqlx_error(e)
}

/// PostgreSQL repository for users and their credentials.
///
/// User + credential creation runs in one transaction so a user row never
/// exists without its credential row.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgUserRepository {
    /// Creates a new repository with a connection pool and store deadline.
    pub fn new(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        bounded(self.timeout, "user.find_by_id", async {
            let row = sqlx::query_as::<_, UserRow>(&format!(
                r#"
                SELECT {USER_COLUMNS}
                FROM users u
                LEFT JOIN user_auth a ON a.user_id = u.id
                WHERE u.id = $1
                "#
            ))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(User::from))
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        bounded(self.timeout, "user.find_by_email", async {
            let row = sqlx::query_as::<_, UserRow>(&format!(
                r#"
                SELECT {USER_COLUMNS}
                FROM users u
                LEFT JOIN user_auth a ON a.user_id = u.id
                WHERE u.email = $1
                "#
            ))
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(User::from))
        })
        .await
    }

    async fn find_by_provider_id(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<User>, AppError> {
        bounded(self.timeout, "user.find_by_provider_id", async {
            let row = sqlx::query_as::<_, UserRow>(&format!(
                r#"
                SELECT {USER_COLUMNS}
                FROM users u
                JOIN user_auth a ON a.user_id = u.id
                WHERE a.provider = $1 AND a.provider_id = $2
                "#
            ))
            .bind(provider)
            .bind(provider_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(User::from))
        })
        .await
    }

    async fn find_by_session_token(
        &self,
        token: &str,
    ) -> Result<Option<(User, UserSession)>, AppError> {
        bounded(self.timeout, "user.find_by_session_token", async {
            let row = sqlx::query_as::<_, SessionUserRow>(&format!(
                r#"
                SELECT {USER_COLUMNS},
                       s.id AS session_id, s.user_id AS session_user_id,
                       s.token, s.expires_at, s.expired_by_user
                FROM user_sessions s
                JOIN users u ON u.id = s.user_id
                LEFT JOIN user_auth a ON a.user_id = u.id
                WHERE s.token = $1
                "#
            ))
            .bind(token)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(|r| {
                let session = UserSession {
                    id: r.session_id,
                    user_id: r.session_user_id,
                    token: r.token,
                    expires_at: r.expires_at,
                    expired_by_user: r.expired_by_user,
                };
                let auth = match (r.auth_value, r.auth_provider) {
                    (Some(value), Some(provider)) => Some(UserAuth { value, provider }),
                    _ => None,
                };
                let user = User::new(
                    r.id,
                    r.given_name,
                    r.family_name,
                    r.email,
                    r.avatar_url,
                    auth,
                );
                (user, session)
            }))
        })
        .await
    }

    async fn create_password_user(&self, args: NewPasswordUser) -> Result<User, AppError> {
        bounded(self.timeout, "user.create_password_user", async {
            let mut tx = self.pool.begin().await?;

            #[derive(sqlx::FromRow)]
            struct InsertedUser {
                id: Uuid,
                given_name: Option<String>,
                family_name: Option<String>,
                email: String,
                avatar_url: Option<String>,
            }

            let user_row = sqlx::query_as::<_, InsertedUser>(
                r#"
                INSERT INTO users (given_name, family_name, email, email_verified)
                VALUES ($1, $2, $3, FALSE)
                RETURNING id, given_name, family_name, email, avatar_url
                "#,
            )
            .bind(&args.given_name)
            .bind(&args.family_name)
            .bind(&args.email)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_user_insert_error)?;

            sqlx::query(
                r#"
                INSERT INTO user_auth (user_id, value, provider, provider_id)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(user_row.id)
            .bind(&args.password_hash)
            .bind(PROVIDER_PASSWORD)
            .bind(user_row.id.to_string())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            Ok(User::new(
                user_row.id,
                user_row.given_name,
                user_row.family_name,
                user_row.email,
                user_row.avatar_url,
                Some(UserAuth {
                    value: args.password_hash,
                    provider: PROVIDER_PASSWORD.to_string(),
                }),
            ))
        })
        .await
    }

    async fn create_oauth_user(&self, args: NewOAuthUser) -> Result<User, AppError> {
        bounded(self.timeout, "user.create_oauth_user", async {
            let mut tx = self.pool.begin().await?;

            #[derive(sqlx::FromRow)]
            struct InsertedUser {
                id: Uuid,
                given_name: Option<String>,
                family_name: Option<String>,
                email: String,
                avatar_url: Option<String>,
            }

            let user_row = sqlx::query_as::<_, InsertedUser>(
                r#"
                INSERT INTO users (given_name, family_name, email, email_verified, avatar_url)
                VALUES ($1, $2, $3, TRUE, $4)
                RETURNING id, given_name, family_name, email, avatar_url
                "#,
            )
            .bind(&args.given_name)
            .bind(&args.family_name)
            .bind(&args.email)
            .bind(&args.avatar_url)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_user_insert_error)?;

            sqlx::query(
                r#"
                INSERT INTO user_auth (user_id, value, provider, provider_id, provider_data)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(user_row.id)
            .bind(&args.value)
            .bind(&args.provider)
            .bind(&args.provider_id)
            .bind(&args.provider_data)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            Ok(User::new(
                user_row.id,
                user_row.given_name,
                user_row.family_name,
                user_row.email,
                user_row.avatar_url,
                Some(UserAuth {
                    value: args.value,
                    provider: args.provider,
                }),
            ))
        })
        .await
    }
}
