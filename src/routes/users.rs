//! # 계정 관리 핸들러 (admin 전용)
//!
//! ## 엔드포인트
//! - `GET   /api/users`      → 전체 계정 목록
//! - `GET   /api/users/{id}` → 계정 조회
//! - `PATCH /api/users/{id}` → 역할, 활성 여부, 이메일 변경

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::AdminUser,
    models::{Role, UpdateUserRequest, UserResponse},
    routes::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let users: Vec<UserResponse> = db_users::list_users(&state.pool)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(json!({ "users": users })))
}

pub async fn get_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

pub async fn update_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if let Some(email) = &req.email {
        if !email.contains('@') {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
    }
    // 관리자는 자기 자신을 비활성화하거나 강등할 수 없습니다.
    let demotes_self = req.is_active == Some(false) || req.role.is_some_and(|r| r != Role::Admin);
    if id == admin.user_id && demotes_self {
        return Err(AppError::BadRequest(
            "Administrators cannot deactivate or demote themselves".to_string(),
        ));
    }

    let user = db_users::update_user(&state.pool, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(
        user_id = user.id,
        admin_id = admin.user_id,
        role = user.role.as_str(),
        is_active = user.is_active,
        "User updated by admin"
    );
    Ok(Json(user.into()))
}
