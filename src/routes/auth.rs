//! # 인증 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/auth/register` → 회원가입 (역할은 항상 employee)
//! - `POST /api/auth/login`    → 로그인
//! - `POST /api/auth/refresh`  → 리프레시 토큰으로 새 토큰 쌍 발급 (기존 토큰은 폐기)
//! - `POST /api/auth/logout`   → 내 리프레시 토큰 전부 폐기
//! - `GET  /api/auth/me`       → 내 계정 정보
//! - `POST /api/auth/password` → 비밀번호 변경 (리프레시 토큰 전부 폐기)

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{
        create_access_token, create_refresh_token, hash_token, verify_refresh_token, AuthError,
        AuthUser,
    },
    models::user::*,
    routes::AppState,
    services::password,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

/// 액세스/리프레시 토큰 쌍을 발급하고 리프레시 토큰의 해시를 저장합니다.
async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = create_access_token(
        user.id,
        user.role,
        &state.jwt_secret,
        state.access_token_minutes,
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(
        user.id,
        user.role,
        &state.jwt_secret,
        state.refresh_token_days,
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    let expires_at = (Utc::now() + Duration::days(state.refresh_token_days))
        .format(TIMESTAMP_FORMAT)
        .to_string();
    db_users::store_refresh_token(&state.pool, user.id, &hash_token(&refresh_token), &expires_at)
        .await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.chars().count() < 3 {
        return Err(AppError::BadRequest(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    validate_password(&req.password)?;
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    // 중복 계정은 충돌(409)이 아니라 입력 오류(400)로 응답합니다.
    if db_users::find_by_username(&state.pool, username).await?.is_some() {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }
    if db_users::find_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = db_users::create_user(&state.pool, username, email, &password_hash, Role::Employee)
        .await
        .map_err(|e| match e.status() {
            // 검사와 INSERT 사이에 같은 이름이 먼저 등록된 경우
            StatusCode::CONFLICT => AppError::BadRequest("Username or email already exists".to_string()),
            _ => e,
        })?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(issue_tokens(&state, user).await?)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

    let user = db_users::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "Login failed: wrong password");
        return Err(invalid());
    }

    // 비밀번호가 맞아도 비활성 계정은 토큰을 받을 수 없습니다.
    if !user.is_active {
        return Err(AuthError::Inactive.into());
    }

    db_users::touch_last_login(&state.pool, user.id).await?;
    let user = db_users::find_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    verify_refresh_token(&req.refresh_token, &state.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let token_hash = hash_token(&req.refresh_token);
    let (_token_id, user_id, expires_at) = db_users::find_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    // 사용한 토큰은 결과와 관계없이 폐기합니다 (rotation).
    db_users::delete_refresh_token(&state.pool, &token_hash).await?;

    let expires = chrono::NaiveDateTime::parse_from_str(&expires_at, TIMESTAMP_FORMAT)
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    if expires.and_utc() < Utc::now() {
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;
    if !user.is_active {
        return Err(AuthError::Inactive.into());
    }

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_user_refresh_tokens(&state.pool, auth_user.user_id).await?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let user = db_users::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !password::verify_password(&req.current_password, &user.password_hash)? {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }
    validate_password(&req.new_password)?;

    let password_hash = password::hash_password(&req.new_password)?;
    db_users::update_password(&state.pool, user.id, &password_hash).await?;
    // 다른 기기에서 발급된 리프레시 토큰도 더는 쓸 수 없게 합니다.
    db_users::delete_user_refresh_tokens(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(json!({ "message": "Password changed successfully" })))
}
