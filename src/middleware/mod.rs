//! # 요청 인증/권한 모듈
//!
//! - `auth`: 토큰 발급/검증과 인증 게이트(`AuthUser` 추출기)
//! - `roles`: 역할 검사 추출기(`StaffUser`, `AdminUser`)

pub mod auth;
pub mod roles;

pub use auth::AuthUser;
pub use roles::{AdminUser, StaffUser};
