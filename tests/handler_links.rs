mod common;

use axum::{
    Router,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use axum_test::TestServer;
use chrono::Duration;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use linkhop::api::handlers::{
    create_link_handler, get_link_handler, list_links_handler, update_link_handler,
};
use linkhop::api::middleware::auth_context;
use linkhop::state::AppState;

fn links_app(state: AppState) -> TestServer {
    let app = Router::new()
        .route(
            "/api/links",
            post(create_link_handler).get(list_links_handler),
        )
        .route(
            "/api/links/{id}",
            get(get_link_handler).patch(update_link_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_context::layer,
        ))
        .with_state(state);

    TestServer::new(app).unwrap()
}

async fn authed_user(pool: &PgPool, email: &str) -> (Uuid, String) {
    let user_id = common::create_test_user(pool, email).await;
    let token = format!("tok-{}", Uuid::new_v4());
    common::create_test_session(pool, user_id, &token, Duration::days(1), false).await;
    (user_id, token)
}

#[sqlx::test]
async fn test_create_link_success(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (_user_id, token) = authed_user(&pool, "ada@example.com").await;

    let response = server
        .post("/api/links")
        .add_header("x-session-token", token.as_str())
        .json(&json!({ "url": "https://example.com/some/page" }))
        .await;

    assert_eq!(response.status_code(), 201);

    let body = response.json::<serde_json::Value>();
    let slug = body["slug"].as_str().unwrap();
    assert_eq!(slug.len(), 12);
    assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["url"], "https://example.com/some/page");
    assert_eq!(
        body["short_url"],
        format!("{}/go/{}", common::BASE_URL, slug)
    );
    assert_eq!(body["active"], true);
    assert_eq!(body["quarantined"], false);
}

#[sqlx::test]
async fn test_create_link_requires_authentication(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = links_app(state);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_create_link_expired_session_is_unauthorized(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let user_id = common::create_test_user(&pool, "ada@example.com").await;
    let token = format!("tok-{}", Uuid::new_v4());
    common::create_test_session(&pool, user_id, &token, Duration::seconds(-5), false).await;

    let response = server
        .post("/api/links")
        .add_header("x-session-token", token.as_str())
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_create_link_rejects_http_scheme(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (_user_id, token) = authed_user(&pool, "ada@example.com").await;

    let response = server
        .post("/api/links")
        .add_header("x-session-token", token.as_str())
        .json(&json!({ "url": "http://example.com" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "invalid_url_protocol");
}

#[sqlx::test]
async fn test_create_link_rejects_garbage_url(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (_user_id, token) = authed_user(&pool, "ada@example.com").await;

    let response = server
        .post("/api/links")
        .add_header("x-session-token", token.as_str())
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "invalid_url");
}

#[sqlx::test]
async fn test_create_link_blocked_domain_persists_nothing(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (_user_id, token) = authed_user(&pool, "ada@example.com").await;
    common::block_domain(&pool, "malware.example.com").await;

    let response = server
        .post("/api/links")
        .add_header("x-session-token", token.as_str())
        .json(&json!({ "url": "https://malware.example.com/payload" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "blocked_domain");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn test_create_link_blocked_user(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (user_id, token) = authed_user(&pool, "ada@example.com").await;
    common::block_user(&pool, user_id).await;

    let response = server
        .post("/api/links")
        .add_header("x-session-token", token.as_str())
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "blocked_user");
}

#[sqlx::test]
async fn test_list_links_returns_only_own_links(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (user_id, token) = authed_user(&pool, "ada@example.com").await;
    let other = common::create_test_user(&pool, "other@example.com").await;

    common::create_test_link(&pool, "aB3dE6gH9jK2", "https://example.com/mine", user_id).await;
    common::create_test_link(&pool, "xY7zQ1wV5uT3", "https://example.com/theirs", other).await;

    let response = server
        .get("/api/links")
        .add_header("x-session-token", token.as_str())
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["slug"], "aB3dE6gH9jK2");
}

#[sqlx::test]
async fn test_get_link_includes_redirect_url(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (user_id, token) = authed_user(&pool, "ada@example.com").await;
    let link_id =
        common::create_test_link(&pool, "aB3dE6gH9jK2", "https://example.com", user_id).await;

    let response = server
        .get(&format!("/api/links/{link_id}"))
        .add_header("x-session-token", token.as_str())
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(
        body["short_url"],
        format!("{}/go/aB3dE6gH9jK2", common::BASE_URL)
    );
}

#[sqlx::test]
async fn test_update_link_writes_history_snapshot(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (user_id, token) = authed_user(&pool, "ada@example.com").await;
    let link_id =
        common::create_test_link(&pool, "aB3dE6gH9jK2", "https://example.com/old", user_id).await;

    let response = server
        .patch(&format!("/api/links/{link_id}"))
        .add_header("x-session-token", token.as_str())
        .json(&json!({ "url": "https://example.com/new", "active": false }))
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["url"], "https://example.com/new");
    assert_eq!(body["active"], false);

    // Exactly one snapshot, capturing the pre-update state.
    assert_eq!(common::count_history_rows(&pool, link_id).await, 1);

    let (prev_url, prev_active): (String, bool) =
        sqlx::query_as("SELECT destination_url, active FROM link_history WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(prev_url, "https://example.com/old");
    assert!(prev_active);
}

#[sqlx::test]
async fn test_update_unknown_link_not_found(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = links_app(state);

    let (_user_id, token) = authed_user(&pool, "ada@example.com").await;

    let response = server
        .patch(&format!("/api/links/{}", Uuid::new_v4()))
        .add_header("x-session-token", token.as_str())
        .json(&json!({ "active": false }))
        .await;

    response.assert_status_not_found();
}
