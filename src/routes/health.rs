//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/health` → `{ "status": "ok", "database": "ok" }`
//!
//! 로드밸런서나 컨테이너 오케스트레이터의 상태 확인용입니다.
//! DB에 간단한 쿼리를 보내 연결 풀도 함께 확인합니다.

use crate::routes::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// `GET /health`: 서버와 DB 상태를 확인합니다.
///
/// DB가 응답하지 않으면 503과 함께 `"database": "unavailable"`을 반환합니다.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check database query failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
