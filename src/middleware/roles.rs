//! # 역할 검사 추출기
//!
//! 핸들러 인자에 `StaffUser`나 `AdminUser`를 두면, 인증 게이트를 통과한 뒤
//! 역할까지 확인한 요청만 핸들러에 도달합니다.
//!
//! - `StaffUser`: admin 또는 hr (인사 데이터 관리)
//! - `AdminUser`: admin (계정 관리)

use axum::{extract::FromRequestParts, http::request::Parts};

use super::auth::AuthUser;
use crate::{error::AppError, models::Role, routes::AppState};

/// admin 또는 hr 역할의 사용자
#[derive(Debug, Clone)]
pub struct StaffUser(pub AuthUser);

/// admin 역할의 사용자
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(forbidden(&user));
        }
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(forbidden(&user));
        }
        Ok(Self(user))
    }
}

fn forbidden(user: &AuthUser) -> AppError {
    tracing::debug!(
        user_id = user.user_id,
        role = user.role.as_str(),
        "Role not allowed for this route"
    );
    AppError::Forbidden("You do not have permission to access this resource".to_string())
}
