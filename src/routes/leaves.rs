//! # 휴가 심사와 본인 휴가 핸들러
//!
//! 휴가의 일반 CRUD는 `records` 모듈의 `/api/leaves` 경로가 처리합니다.
//!
//! ## 엔드포인트
//! - `POST /api/leaves/{id}/approve` → 승인 (admin, hr)
//! - `POST /api/leaves/{id}/reject`  → 반려 (admin, hr)
//! - `GET  /api/me/leaves`           → 내 휴가 목록
//! - `POST /api/me/leaves`           → 내 휴가 신청

use crate::{
    db,
    error::AppError,
    middleware::{AuthUser, StaffUser},
    models::{Employee, Leave, LeavePayload, LeaveStatus},
    routes::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn approve_leave(
    StaffUser(reviewer): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Leave>, AppError> {
    let leave =
        db::leaves::review_leave(&state.pool, id, LeaveStatus::Approved, reviewer.user_id).await?;
    Ok(Json(leave))
}

pub async fn reject_leave(
    StaffUser(reviewer): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Leave>, AppError> {
    let leave =
        db::leaves::review_leave(&state.pool, id, LeaveStatus::Rejected, reviewer.user_id).await?;
    Ok(Json(leave))
}

async fn own_employee(state: &AppState, auth_user: &AuthUser) -> Result<Employee, AppError> {
    db::employees::find_by_user_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn my_leaves(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let employee = own_employee(&state, &auth_user).await?;
    let leaves = db::records::list::<Leave>(&state.pool, Some(employee.id)).await?;
    Ok(Json(json!({ "items": leaves })))
}

/// `POST /me/leaves`: 본인 명의로 휴가를 신청합니다. 새 휴가는 항상 pending 상태입니다.
pub async fn apply_leave(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LeavePayload>,
) -> Result<(StatusCode, Json<Leave>), AppError> {
    let employee = own_employee(&state, &auth_user).await?;
    let leave = db::records::create::<Leave>(&state.pool, employee.id, &req).await?;

    tracing::info!(
        leave_id = leave.id,
        employee_id = employee.id,
        days = leave.days,
        "Leave requested"
    );
    Ok((StatusCode::CREATED, Json(leave)))
}
