mod common;

use axum::{Router, http::StatusCode, middleware, routing::post};
use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;

use linkhop::api::handlers::{login_password_handler, register_handler};
use linkhop::api::middleware::auth_context;
use linkhop::state::AppState;

fn auth_app(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/api/users", post(register_handler))
        .route("/api/sessions/password", post(login_password_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_context::layer,
        ))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_register_creates_user_and_credential(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = auth_app(state);

    let response = server
        .post("/api/users")
        .json(&json!({
            "given_name": "Ada",
            "family_name": "Lovelace",
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["email"], "ada@example.com");

    // Credential row exists and is a hash, not the password.
    let (provider, value): (String, String) = sqlx::query_as(
        "SELECT provider, value FROM user_auth a
         JOIN users u ON u.id = a.user_id WHERE u.email = $1",
    )
    .bind("ada@example.com")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(provider, "password");
    assert!(value.starts_with("$argon2"));
}

#[sqlx::test]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = auth_app(state);

    common::create_test_user(&pool, "ada@example.com").await;

    let response = server
        .post("/api/users")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "conflict");
}

#[sqlx::test]
async fn test_register_rejects_short_password(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = auth_app(state);

    let response = server
        .post("/api/users")
        .json(&json!({
            "email": "ada@example.com",
            "password": "short"
        }))
        .await;

    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_password_login_issues_session(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = auth_app(state);

    server
        .post("/api/users")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await
        .assert_status_success();

    let response = server
        .post("/api/sessions/password")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await;

    response.assert_status_ok();

    let cookie = response.header("set-cookie");
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("x-session-token="));
    assert!(cookie.contains("HttpOnly"));

    let body = response.json::<serde_json::Value>();
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.len(), 43);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions WHERE token = $1")
            .bind(token)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test]
async fn test_password_login_wrong_password_unauthorized(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = auth_app(state);

    server
        .post("/api/users")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await
        .assert_status_success();

    let response = server
        .post("/api/sessions/password")
        .json(&json!({
            "email": "ada@example.com",
            "password": "wrong-password-entirely"
        }))
        .await;

    response.assert_status_unauthorized();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn test_unknown_email_and_wrong_password_look_identical(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = auth_app(state);

    server
        .post("/api/users")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await
        .assert_status_success();

    let wrong_password = server
        .post("/api/sessions/password")
        .json(&json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .await;
    let unknown_email = server
        .post("/api/sessions/password")
        .json(&json!({ "email": "ghost@example.com", "password": "wrong-password" }))
        .await;

    assert_eq!(wrong_password.status_code(), unknown_email.status_code());
    assert_eq!(
        wrong_password.json::<serde_json::Value>()["error"]["message"],
        unknown_email.json::<serde_json::Value>()["error"]["message"]
    );
}

#[sqlx::test]
async fn test_relogin_revokes_prior_session(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = auth_app(state);

    server
        .post("/api/users")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await
        .assert_status_success();

    let first = server
        .post("/api/sessions/password")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await;
    let first_token = first.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    // Re-authenticate presenting the first session.
    let second = server
        .post("/api/sessions/password")
        .add_header("x-session-token", first_token.as_str())
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .await;
    second.assert_status_ok();
    let second_token = second.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    assert_ne!(first_token, second_token);

    // Exactly the prior session is revoked; the new one is live.
    let (first_revoked,): (bool,) =
        sqlx::query_as("SELECT expired_by_user FROM user_sessions WHERE token = $1")
            .bind(&first_token)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(first_revoked);

    let (second_revoked,): (bool,) =
        sqlx::query_as("SELECT expired_by_user FROM user_sessions WHERE token = $1")
            .bind(&second_token)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(!second_revoked);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 2);
}
