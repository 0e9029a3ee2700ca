mod common;

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use linkhop::domain::repositories::BlockRepository;
use linkhop::infrastructure::persistence::PgBlockRepository;

fn repo(pool: &PgPool) -> PgBlockRepository {
    PgBlockRepository::new(Arc::new(pool.clone()), std::time::Duration::from_secs(10))
}

#[sqlx::test]
async fn test_unlisted_domain_is_not_blocked(pool: PgPool) {
    // Row absence is a normal false, not an error.
    let blocked = repo(&pool)
        .is_domain_blocked("example.com")
        .await
        .unwrap();
    assert!(!blocked);
}

#[sqlx::test]
async fn test_listed_domain_is_blocked(pool: PgPool) {
    common::block_domain(&pool, "malware.example.com").await;

    let repo = repo(&pool);
    assert!(repo.is_domain_blocked("malware.example.com").await.unwrap());
    // Exact host match only.
    assert!(!repo.is_domain_blocked("example.com").await.unwrap());
}

#[sqlx::test]
async fn test_unlisted_user_is_not_blocked(pool: PgPool) {
    let blocked = repo(&pool).is_user_blocked(Uuid::new_v4()).await.unwrap();
    assert!(!blocked);
}

#[sqlx::test]
async fn test_listed_user_is_blocked(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "blocked@example.com").await;
    common::block_user(&pool, user_id).await;

    assert!(repo(&pool).is_user_blocked(user_id).await.unwrap());
}
