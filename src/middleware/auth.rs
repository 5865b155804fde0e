//! # 인증 게이트
//!
//! `Authorization: Bearer <token>` 헤더의 액세스 토큰을 검증하고,
//! 토큰이 가리키는 사용자를 DB에서 읽어 요청에 신원과 역할을 붙입니다.
//!
//! 흐름:
//! 1. 헤더 없음 → 401 `missing_token`
//! 2. 서명 불일치/형식 오류 → 401 `invalid_token`, 만료 → 401 `expired_token`
//! 3. 사용자가 없음 → 401 `invalid_token`
//! 4. 비활성 계정 → 403 `account_inactive`
//! 5. 통과 → `last_login` 갱신 후 핸들러 실행
//!
//! 역할은 토큰이 아니라 DB에 저장된 값을 사용합니다.
//! 관리자가 역할을 바꾸면 다음 요청부터 바로 반영됩니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::{db::users as db_users, error::AppError, models::Role, routes::AppState};

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub role: Role,
    /// "access" 또는 "refresh". 리프레시 토큰을 Bearer로 쓰지 못하게 구분합니다.
    pub typ: String,
    /// 토큰마다 고유한 값. 같은 초에 발급된 리프레시 토큰도 해시가 겹치지 않습니다.
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// 인증을 통과한 사용자
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization token is required")]
    MissingToken,
    #[error("Invalid authorization token")]
    InvalidToken,
    #[error("Authorization token has expired")]
    ExpiredToken,
    #[error("Account is inactive")]
    Inactive,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Inactive => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::Inactive => "account_inactive",
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 같은 요청에서 두 번 추출되면(역할 추출기 + 핸들러) 한 번만 검사합니다.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let user = authenticate_token(&state.pool, &state.jwt_secret, token).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// 액세스 토큰을 검증하고 사용자를 확인합니다. 성공하면 `last_login`을 갱신합니다.
pub async fn authenticate_token(
    pool: &SqlitePool,
    secret: &str,
    token: &str,
) -> Result<AuthUser, AppError> {
    let claims = verify_token(token, secret, ACCESS)?;
    let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

    let user = db_users::find_by_id(pool, user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    if !user.is_active {
        tracing::debug!(user_id, "Rejected token of inactive account");
        return Err(AuthError::Inactive.into());
    }

    db_users::touch_last_login(pool, user.id).await?;

    Ok(AuthUser {
        user_id: user.id,
        username: user.username,
        role: user.role,
    })
}

fn create_token(
    user_id: i64,
    role: Role,
    typ: &str,
    lifetime: Duration,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        typ: typ.to_string(),
        jti: uuid::Uuid::now_v7().to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_access_token(
    user_id: i64,
    role: Role,
    secret: &str,
    minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(user_id, role, ACCESS, Duration::minutes(minutes), secret)
}

pub fn create_refresh_token(
    user_id: i64,
    role: Role,
    secret: &str,
    days: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(user_id, role, REFRESH, Duration::days(days), secret)
}

/// 서명과 만료를 검증하고, 토큰 종류(`typ`)가 기대한 값인지 확인합니다.
pub fn verify_token(token: &str, secret: &str, expected_typ: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    // 만료 직후의 토큰도 확실히 거부되도록 허용 오차를 없앱니다.
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    if token_data.claims.typ != expected_typ {
        return Err(AuthError::InvalidToken);
    }
    Ok(token_data.claims)
}

pub fn verify_refresh_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    verify_token(token, secret, REFRESH)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
