//! 통합 테스트 공용 헬퍼
//!
//! 인메모리 SQLite와 임시 업로드 디렉토리로 라우터를 만들고,
//! `tower::ServiceExt::oneshot`으로 서버 없이 요청을 보냅니다.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use hrdesk::{
    db,
    middleware::auth::create_access_token,
    models::{Role, User},
    routes::{router, AppState},
    services::password,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const BOUNDARY: &str = "hrdesk-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::connect_in_memory().await.expect("in-memory database");
        let uploads = tempfile::tempdir().expect("uploads dir");
        let state = AppState {
            pool: pool.clone(),
            uploads_path: uploads.path().to_str().expect("utf-8 path").to_string(),
            jwt_secret: SECRET.to_string(),
            access_token_minutes: 60,
            refresh_token_days: 7,
        };
        Self {
            app: router(state, 5 * 1024 * 1024),
            pool,
            uploads,
        }
    }

    pub fn uploads_path(&self) -> &str {
        self.uploads.path().to_str().expect("utf-8 path")
    }

    /// 계정을 만들고 액세스 토큰을 돌려줍니다.
    pub async fn user(&self, username: &str, role: Role) -> (User, String) {
        let hash = password::hash_password("password123").expect("hash");
        let user = db::users::create_user(
            &self.pool,
            username,
            &format!("{}@example.com", username),
            &hash,
            role,
        )
        .await
        .expect("create user");
        let token = create_access_token(user.id, role, SECRET, 60).expect("token");
        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.json(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, uri, Some(token), Some(body)).await
    }

    /// multipart 업로드 요청 (`file` 필드와 선택 `category` 필드)
    pub async fn upload(
        &self,
        uri: &str,
        token: &str,
        file_name: &str,
        content: &[u8],
        category: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        if let Some(category) = category {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"category\"\r\n\r\n{category}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .expect("request");
        self.send(request).await
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("count")
    }
}
