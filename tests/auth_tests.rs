//! Integration tests for the session store: login, registration, token
//! completion, logout, and token eviction.

mod common;

use common::{TestEnv, auth_json, error_json, task_json, user_json};
use taskline::ApiError;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_persists_token_and_user() {
    let mut env = TestEnv::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "a@b.com",
            "password": "x",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(auth_json("T1", user_json("u1", "A"))),
        )
        .mount(&env.server)
        .await;

    let user = env
        .app
        .session
        .login_with_credentials("a@b.com", "x")
        .await
        .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "A");
    assert_eq!(env.app.session.user().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(env.token(), Some("T1".to_string()));
}

#[tokio::test]
async fn test_login_rejection_raises_auth_error() {
    let mut env = TestEnv::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_json("Invalid credentials")))
        .mount(&env.server)
        .await;

    let err = env
        .app
        .session
        .login_with_credentials("a@b.com", "wrong")
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ApiError>(),
        Some(&ApiError::Auth("Invalid credentials".to_string()))
    );
    assert!(env.app.session.user().is_none());
    assert_eq!(env.token(), None);
}

#[tokio::test]
async fn test_login_server_rejection_rewrapped_as_auth_error() {
    let mut env = TestEnv::new().await;

    // Some rejections come back as 400 with a message body
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_json("Missing password")))
        .mount(&env.server)
        .await;

    let err = env
        .app
        .session
        .login_with_credentials("a@b.com", "")
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ApiError>(),
        Some(&ApiError::Auth("Missing password".to_string()))
    );
}

#[tokio::test]
async fn test_login_network_failure_stays_network_error() {
    // Nothing is listening here
    let mut app = taskline::App::new(
        "http://127.0.0.1:1",
        std::sync::Arc::new(taskline::MemoryTokenStore::new()),
    );

    let err = app
        .session
        .login_with_credentials("a@b.com", "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Network(_))
    ));
}

#[tokio::test]
async fn test_register_persists_token_and_user() {
    let mut env = TestEnv::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "pw",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(auth_json("T2", user_json("u2", "Ada"))),
        )
        .mount(&env.server)
        .await;

    let user = env
        .app
        .session
        .register_with_credentials("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    assert_eq!(user.id, "u2");
    assert_eq!(env.token(), Some("T2".to_string()));
}

#[tokio::test]
async fn test_register_rejection_carries_server_message() {
    let mut env = TestEnv::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(error_json("Email already registered")),
        )
        .mount(&env.server)
        .await;

    let err = env
        .app
        .session
        .register_with_credentials("Ada", "ada@example.com", "pw")
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ApiError>(),
        Some(&ApiError::Auth("Email already registered".to_string()))
    );
}

#[tokio::test]
async fn test_complete_token_login_fetches_profile() {
    let mut env = TestEnv::new().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "A")))
        .mount(&env.server)
        .await;

    env.app.session.complete_token_login("T1").await.unwrap();

    assert_eq!(env.app.session.user().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(env.app.session.error(), None);
    assert_eq!(env.token(), Some("T1".to_string()));
}

#[tokio::test]
async fn test_complete_token_login_failure_clears_token_and_records_error() {
    let mut env = TestEnv::new().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_json("Token expired")))
        .mount(&env.server)
        .await;

    // Recorded, not re-raised
    env.app.session.complete_token_login("stale").await.unwrap();

    assert!(env.app.session.user().is_none());
    assert_eq!(env.app.session.error(), Some("Token expired"));
    assert_eq!(env.token(), None);
}

#[tokio::test]
async fn test_logout_clears_token_user_and_local_tasks() {
    let mut env = TestEnv::authenticated("T1").await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "A")))
        .mount(&env.server)
        .await;
    env.app.session.complete_token_login("T1").await.unwrap();

    env.seed_tasks(&[task_json("t1", "Something", "Open")]).await;

    env.app.logout();

    assert!(env.app.session.user().is_none());
    assert_eq!(env.token(), None);
    assert!(env.app.tasks.tasks().is_empty());
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let mut env = TestEnv::new().await;

    env.app.logout();

    assert!(env.app.session.user().is_none());
    assert_eq!(env.token(), None);
}
