//! 인증과 권한 통합 테스트

mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, SECRET};
use hrdesk::{middleware::auth::create_access_token, models::Role};
use serde_json::json;

#[tokio::test]
async fn register_then_login() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "minji", "email": "minji@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "employee");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["access_token"].as_str().is_some());

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "minji", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"]["last_login"].as_str().is_some());
}

#[tokio::test]
async fn duplicate_registration_is_a_bad_request() {
    let app = TestApp::new().await;
    let request = json!({ "username": "minji", "email": "minji@example.com", "password": "password123" });

    let (status, _) = app
        .json(Method::POST, "/api/auth/register", None, Some(request.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .json(Method::POST, "/api/auth/register", None, Some(request))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.user("minji", Role::Employee).await;

    let (status, _) = app
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "minji", "password": "not-the-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_malformed_and_expired_tokens_are_rejected() {
    let app = TestApp::new().await;
    let (user, _) = app.user("minji", Role::Employee).await;

    let (status, body) = app.json(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "missing_token");

    let (status, body) = app.get("/api/auth/me", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "invalid_token");

    let expired = create_access_token(user.id, Role::Employee, SECRET, -5).unwrap();
    let (status, body) = app.get("/api/auth/me", &expired).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "expired_token");

    let foreign = create_access_token(user.id, Role::Employee, "another-secret", 60).unwrap();
    let (status, _) = app.get("/api/auth/me", &foreign).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_account_is_forbidden() {
    let app = TestApp::new().await;
    let (user, token) = app.user("minji", Role::Employee).await;

    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "account_inactive");

    let (status, _) = app
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "minji", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn authenticated_request_records_last_login() {
    let app = TestApp::new().await;
    let (user, token) = app.user("minji", Role::Employee).await;
    assert!(user.last_login.is_none());

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "minji");

    let stored: Option<String> = sqlx::query_scalar("SELECT last_login FROM users WHERE id = ?")
        .bind(user.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn employee_role_cannot_reach_staff_or_admin_routes() {
    let app = TestApp::new().await;
    let (_, employee) = app.user("minji", Role::Employee).await;
    let (_, hr) = app.user("hana", Role::Hr).await;

    let (status, body) = app.get("/api/employees", &employee).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");

    let (status, _) = app.get("/api/bank-details", &employee).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/employees", &hr).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/users", &hr).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn refresh_token_is_single_use() {
    let app = TestApp::new().await;
    app.user("minji", Role::Employee).await;

    let (_, login) = app
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "minji", "password": "password123" })),
        )
        .await;
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let (status, rotated) = app
        .json(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(rotated["refresh_token"], login["refresh_token"]);

    let (status, _) = app
        .json(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::new().await;
    let (status, body) = app.json(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}
