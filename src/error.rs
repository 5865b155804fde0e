//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 응답 본문 형식:
//! ```json
//! { "error": { "code": "not_found", "message": "Resource not found" } }
//! ```
//! 500 응답에는 원인 에러 문자열이 `details` 필드로 함께 내려갑니다.

// axum에서 HTTP 응답 관련 타입 가져오기
use axum::{
    http::StatusCode,                  // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // 응답 변환 트레이트와 응답 타입
    Json,                              // JSON 응답 래퍼
};
use serde_json::{json, Value}; // json! 매크로와 동적 JSON 값
use thiserror::Error; // #[derive(Error)]로 std::error::Error를 자동 구현

use crate::middleware::auth::AuthError;

// ── enum(열거형)과 thiserror ──
// enum은 "여러 경우 중 하나"를 표현하는 타입입니다.
// #[error("...")]는 Display 출력 문구를, #[from]은 From 변환을 자동으로 만듭니다.
// From이 있으면 sqlx::Error를 반환하는 코드에서 `?`만 써도 AppError로 바뀝니다.

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청, 입력값 검증 실패 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 없음 (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 리소스 충돌 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류
    /// UNIQUE 위반은 409, FOREIGN KEY 위반은 400, 나머지는 500으로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 인증 게이트 거부 (HTTP 401, 비활성 계정은 403)
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl AppError {
    // match: 모든 variant를 빠짐없이 처리해야 컴파일됩니다.

    /// 이 에러가 어떤 상태 코드로 응답되는지 반환합니다.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(e) => match constraint_kind(e) {
                Some(Constraint::Unique) => StatusCode::CONFLICT,
                Some(Constraint::ForeignKey) => StatusCode::BAD_REQUEST,
                None => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(e) => e.status(),
        }
    }

    /// 응답 본문(JSON)을 만듭니다. 테스트에서도 그대로 사용합니다.
    pub fn body(&self) -> Value {
        let (code, message, details): (&str, String, Option<String>) = match self {
            AppError::NotFound => ("not_found", self.to_string(), None),
            AppError::BadRequest(msg) => ("bad_request", msg.clone(), None),
            AppError::Unauthorized(msg) => ("unauthorized", msg.clone(), None),
            AppError::Forbidden(msg) => ("forbidden", msg.clone(), None),
            AppError::Conflict(msg) => ("conflict", msg.clone(), None),
            AppError::Internal(msg) => (
                "internal_error",
                "An internal error occurred".to_string(),
                Some(msg.clone()),
            ),
            AppError::Database(e) => match constraint_kind(e) {
                Some(Constraint::Unique) => (
                    "conflict",
                    "A record with the same unique value already exists".to_string(),
                    None,
                ),
                Some(Constraint::ForeignKey) => (
                    "bad_request",
                    "Referenced record does not exist".to_string(),
                    None,
                ),
                None => (
                    "database_error",
                    "A database error occurred".to_string(),
                    Some(e.to_string()),
                ),
            },
            AppError::Io(e) => (
                "io_error",
                "An IO error occurred".to_string(),
                Some(e.to_string()),
            ),
            AppError::Auth(e) => (e.code(), e.to_string(), None),
        };

        let mut error = json!({ "code": code, "message": message });
        if let Some(details) = details {
            error["details"] = Value::String(details);
        }
        json!({ "error": error })
    }
}

/// 데이터베이스 제약 조건 위반 종류
enum Constraint {
    Unique,
    ForeignKey,
}

fn constraint_kind(e: &sqlx::Error) -> Option<Constraint> {
    // Option에서도 `?`를 쓸 수 있습니다. DB 에러가 아니면 None을 반환합니다.
    let db_err = e.as_database_error()?;
    if db_err.is_unique_violation() {
        Some(Constraint::Unique)
    } else if db_err.is_foreign_key_violation() {
        Some(Constraint::ForeignKey)
    } else {
        None
    }
}

// IntoResponse 구현: 핸들러가 Err(AppError)를 반환하면 Axum이 이 메서드로 응답을 만듭니다.
impl IntoResponse for AppError {
    // self를 값으로 받으므로 에러의 소유권이 이 메서드로 넘어옵니다.
    fn into_response(self) -> Response {
        let status = self.status();
        // 내부 에러는 서버 로그에도 남깁니다.
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(self.body())).into_response()
    }
}
