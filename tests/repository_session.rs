mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use linkhop::domain::repositories::{NewSession, SessionRepository, UserRepository};
use linkhop::infrastructure::persistence::{PgSessionRepository, PgUserRepository};

const STORE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

fn session_repo(pool: &PgPool) -> PgSessionRepository {
    PgSessionRepository::new(Arc::new(pool.clone()), STORE_TIMEOUT)
}

fn user_repo(pool: &PgPool) -> PgUserRepository {
    PgUserRepository::new(Arc::new(pool.clone()), STORE_TIMEOUT)
}

#[sqlx::test]
async fn test_insert_persists_session(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ada@example.com").await;
    let expires_at = Utc::now() + Duration::days(30);

    let session = session_repo(&pool)
        .insert(NewSession {
            user_id,
            token: "9hXk2mP4qRsTuVwXyZ0aBcDeFgHiJkLmNoPqRsTuVwX".to_string(),
            expires_at,
        })
        .await
        .unwrap();

    assert_eq!(session.user_id, user_id);
    assert!(!session.expired_by_user);
    assert!(!session.is_expired());
}

#[sqlx::test]
async fn test_token_resolves_to_user_and_session(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ada@example.com").await;
    common::create_test_session(&pool, user_id, "resolvable-token", Duration::days(1), false)
        .await;

    let (user, session) = user_repo(&pool)
        .find_by_session_token("resolvable-token")
        .await
        .unwrap()
        .expect("token should resolve");

    assert_eq!(user.id, user_id);
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.token, "resolvable-token");
}

#[sqlx::test]
async fn test_unknown_token_resolves_to_none(pool: PgPool) {
    let result = user_repo(&pool)
        .find_by_session_token("unknown-token")
        .await
        .unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
async fn test_lazily_expired_row_is_still_returned(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ada@example.com").await;
    common::create_test_session(&pool, user_id, "stale-token", Duration::seconds(-10), false)
        .await;

    // Storage does not pre-filter expiry; the entity reports it instead.
    let (_, session) = user_repo(&pool)
        .find_by_session_token("stale-token")
        .await
        .unwrap()
        .expect("row should be returned even when expired");

    assert!(session.is_expired());
}

#[sqlx::test]
async fn test_expire_flips_the_revocation_flag(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ada@example.com").await;
    let session_id =
        common::create_test_session(&pool, user_id, "to-revoke", Duration::days(1), false).await;

    session_repo(&pool).expire(session_id).await.unwrap();

    let (_, session) = user_repo(&pool)
        .find_by_session_token("to-revoke")
        .await
        .unwrap()
        .unwrap();

    assert!(session.expired_by_user);
    assert!(session.is_expired());
}

#[sqlx::test]
async fn test_expire_unknown_session_is_noop(pool: PgPool) {
    session_repo(&pool).expire(Uuid::new_v4()).await.unwrap();
}

#[sqlx::test]
async fn test_expire_touches_only_the_target_session(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ada@example.com").await;
    let first =
        common::create_test_session(&pool, user_id, "first-token", Duration::days(1), false).await;
    common::create_test_session(&pool, user_id, "second-token", Duration::days(1), false).await;

    session_repo(&pool).expire(first).await.unwrap();

    let (_, second) = user_repo(&pool)
        .find_by_session_token("second-token")
        .await
        .unwrap()
        .unwrap();

    assert!(!second.expired_by_user);
}
