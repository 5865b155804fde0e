//! # localStorage 데이터 이관 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/migration/import` → 직원 기록 일괄 이관 (admin, hr)
//! - `GET  /api/migration/status` → 테이블별 행 수

use crate::{
    db,
    error::AppError,
    middleware::StaffUser,
    models::{ImportReport, ImportRequest},
    routes::AppState,
    services,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// 직원마다 독립된 트랜잭션으로 이관하고, 성공/건너뜀/실패 결과를 돌려줍니다.
/// 일부 직원이 실패해도 응답은 200입니다.
pub async fn import(
    StaffUser(actor): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportReport>, AppError> {
    tracing::info!(
        employees = req.employees.len(),
        requested_by = actor.user_id,
        "Starting migration import"
    );
    let report = services::migration::import_employees(
        &state.pool,
        &state.uploads_path,
        actor.user_id,
        &req,
    )
    .await?;
    Ok(Json(report))
}

pub async fn status(
    _staff: StaffUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let counts = db::table_counts(&state.pool).await?;
    Ok(Json(json!({ "counts": counts })))
}
