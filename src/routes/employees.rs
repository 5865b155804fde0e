//! # 직원(Employee) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/employees`              → 직원 목록 (department, status, q, limit, offset)
//! - `POST   /api/employees`              → 직원 생성 (선택: 로그인 계정 함께 생성)
//! - `GET    /api/employees/{id}`         → 직원 조회
//! - `PUT    /api/employees/{id}`         → 직원 수정 (포함된 필드만)
//! - `DELETE /api/employees/{id}`         → 직원과 하위 기록 삭제, 계정 비활성화
//! - `GET    /api/employees/{id}/profile` → 직원과 모든 하위 기록
//! - `GET    /api/me/employee`            → 로그인한 사용자의 직원 정보

use crate::{
    db::{self, employees::AccountInsert},
    error::AppError,
    middleware::{AuthUser, StaffUser},
    models::{CreateEmployeeRequest, Employee, EmployeePayload, EmployeeProfile, EmployeeQuery, Role},
    routes::AppState,
    services::{files, password},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_employees(
    _staff: StaffUser,
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> Result<Json<Value>, AppError> {
    let employees = db::employees::list_employees(&state.pool, &query).await?;
    Ok(Json(json!({ "employees": employees })))
}

pub async fn get_employee(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, AppError> {
    let employee = db::employees::get_employee(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(employee))
}

/// `POST /employees`: 직원을 만듭니다.
///
/// `account`가 있으면 계정 INSERT와 직원 INSERT가 한 트랜잭션으로 실행되어,
/// 사번 중복 등으로 직원 생성이 실패하면 계정도 남지 않습니다.
pub async fn create_employee(
    StaffUser(actor): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    req.employee.validate_create()?;

    let password_hash = match &req.account {
        Some(account) => {
            if account.username.trim().chars().count() < 3 {
                return Err(AppError::BadRequest(
                    "Username must be at least 3 characters".to_string(),
                ));
            }
            if account.password.chars().count() < 8 {
                return Err(AppError::BadRequest(
                    "Password must be at least 8 characters".to_string(),
                ));
            }
            if !account.email.contains('@') {
                return Err(AppError::BadRequest("Invalid email address".to_string()));
            }
            // hr는 관리자 계정을 만들 수 없습니다.
            if account.role == Some(Role::Admin) && actor.role != Role::Admin {
                return Err(AppError::Forbidden(
                    "Only administrators can create admin accounts".to_string(),
                ));
            }
            Some(password::hash_password(&account.password)?)
        }
        None => None,
    };

    let account = match (&req.account, &password_hash) {
        (Some(account), Some(hash)) => Some(AccountInsert {
            username: account.username.trim(),
            email: account.email.trim(),
            password_hash: hash,
            role: account.role.unwrap_or(Role::Employee),
        }),
        _ => None,
    };

    let employee = db::employees::create_employee(&state.pool, &req.employee, account).await?;
    tracing::info!(
        employee_id = employee.id,
        employee_code = %employee.employee_code,
        created_by = actor.user_id,
        "Employee created"
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EmployeePayload>,
) -> Result<Json<Employee>, AppError> {
    req.validate()?;
    for (field, value) in [
        ("employee_code", &req.employee_code),
        ("first_name", &req.first_name),
        ("last_name", &req.last_name),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(AppError::BadRequest(format!("{} must not be empty", field)));
        }
    }

    let employee = db::employees::update_employee(&state.pool, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(employee))
}

/// `DELETE /employees/{id}`: 직원을 삭제합니다.
///
/// 하위 기록 삭제, 계정 비활성화, 직원 삭제가 한 트랜잭션으로 실행되고,
/// 커밋된 뒤에 디스크의 첨부파일/증빙서류를 지웁니다.
///
/// 연결된 계정이 비활성화되므로 계정 관리 규칙을 그대로 따릅니다.
/// 관리자 계정이 연결된 직원은 관리자만 삭제할 수 있고, 자기 계정이 연결된 직원은 삭제할 수 없습니다.
pub async fn delete_employee(
    StaffUser(actor): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let employee = db::employees::get_employee(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(user_id) = employee.user_id {
        if user_id == actor.user_id {
            return Err(AppError::BadRequest(
                "You cannot delete the employee record linked to your own account".to_string(),
            ));
        }
        let linked = db::users::find_by_id(&state.pool, user_id).await?;
        if linked.is_some_and(|user| user.role == Role::Admin) && actor.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Only administrators can delete an employee linked to an admin account".to_string(),
            ));
        }
    }

    let files_to_remove = db::employees::delete_employee(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    files::remove_all(&state.uploads_path, &files_to_remove).await;

    tracing::info!(
        employee_id = id,
        deleted_by = actor.user_id,
        files = files_to_remove.len(),
        "Employee deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_profile(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EmployeeProfile>, AppError> {
    let profile = db::employees::profile(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(profile))
}

/// `GET /me/employee`: 로그인한 사용자에게 연결된 직원 정보
pub async fn my_employee(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Employee>, AppError> {
    let employee = db::employees::find_by_user_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(employee))
}
