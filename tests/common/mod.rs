#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use linkhop::application::services::{
    LinkService, OAuthService, RedirectService, SessionService, UserService,
};
use linkhop::domain::visit_event::VisitEvent;
use linkhop::infrastructure::identity::GoogleIdentityProvider;
use linkhop::infrastructure::persistence::{
    PgBlockRepository, PgLinkRepository, PgSessionRepository, PgUserRepository,
};
use linkhop::state::AppState;

pub const BASE_URL: &str = "https://lh.example.com";

const STORE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

pub async fn create_test_user(pool: &PgPool, email: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_link(pool: &PgPool, slug: &str, url: &str, owner: Uuid) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO links (slug, destination_url, created_by, updated_by)
         VALUES ($1, $2, $3, $3) RETURNING id",
    )
    .bind(slug)
    .bind(url)
    .bind(owner)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_inactive_link(pool: &PgPool, slug: &str, url: &str, owner: Uuid) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO links (slug, destination_url, created_by, updated_by, active)
         VALUES ($1, $2, $3, $3, FALSE) RETURNING id",
    )
    .bind(slug)
    .bind(url)
    .bind(owner)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_quarantined_link(pool: &PgPool, slug: &str, url: &str, owner: Uuid) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO links (slug, destination_url, created_by, updated_by, quarantined)
         VALUES ($1, $2, $3, $3, TRUE) RETURNING id",
    )
    .bind(slug)
    .bind(url)
    .bind(owner)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn block_domain(pool: &PgPool, domain: &str) {
    sqlx::query("INSERT INTO blocked_domains (domain) VALUES ($1)")
        .bind(domain)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn block_user(pool: &PgPool, user_id: Uuid) {
    sqlx::query("INSERT INTO blocked_users (user_id) VALUES ($1)")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Inserts a session row directly, bypassing the service.
pub async fn create_test_session(
    pool: &PgPool,
    user_id: Uuid,
    token: &str,
    expires_in: Duration,
    expired_by_user: bool,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO user_sessions (user_id, token, expires_at, expired_by_user)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(token)
    .bind(Utc::now() + expires_in)
    .bind(expired_by_user)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count_history_rows(pool: &PgPool, link_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM link_history WHERE link_id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<VisitEvent>) {
    let pool_arc = Arc::new(pool.clone());
    let (tx, rx) = mpsc::channel(100);

    let link_repo = Arc::new(PgLinkRepository::new(pool_arc.clone(), STORE_TIMEOUT));
    let block_repo = Arc::new(PgBlockRepository::new(pool_arc.clone(), STORE_TIMEOUT));
    let user_repo = Arc::new(PgUserRepository::new(pool_arc.clone(), STORE_TIMEOUT));
    let session_repo = Arc::new(PgSessionRepository::new(pool_arc.clone(), STORE_TIMEOUT));

    let link_service = Arc::new(LinkService::new(
        link_repo.clone(),
        block_repo.clone(),
        BASE_URL.to_string(),
    ));
    let redirect_service = Arc::new(RedirectService::new(link_repo, block_repo));
    let session_service = Arc::new(SessionService::new(user_repo.clone(), session_repo, 30));
    let user_service = Arc::new(UserService::new(user_repo.clone()));
    let identity_provider = Arc::new(GoogleIdentityProvider::new(
        "test-client-id".to_string(),
        "test-client-secret".to_string(),
        BASE_URL,
    ));
    let oauth_service = Arc::new(OAuthService::new(
        user_repo,
        session_service.clone(),
        identity_provider,
    ));

    let state = AppState {
        db: pool,
        link_service,
        redirect_service,
        session_service,
        user_service,
        oauth_service,
        visit_sender: tx,
    };

    (state, rx)
}
