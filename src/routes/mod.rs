//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 전체 라우터 구성입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 토큰 갱신, 로그아웃, 내 정보, 비밀번호 변경
//! - `users`: 관리자용 계정 관리
//! - `employees`: 직원 CRUD, 전체 프로필, 내 직원 정보
//! - `records`: 직원 하위 기록 공통 CRUD와 증빙서류 업로드
//! - `leaves`: 휴가 승인/반려, 내 휴가
//! - `attachments`: 직원 첨부파일
//! - `migration`: localStorage 데이터 이관
//! - `health`: 서버 상태 확인
//!
//! ## 권한
//! 핸들러 인자의 추출기로 표현합니다.
//! - 없음: 공개 (health, register, login, refresh)
//! - `AuthUser`: 로그인한 모든 사용자
//! - `StaffUser`: admin, hr
//! - `AdminUser`: admin

pub mod attachments;
pub mod auth;
pub mod employees;
pub mod health;
pub mod leaves;
pub mod migration;
pub mod records;
pub mod users;

use crate::models::{
    Asset, BankDetail, Dependent, Leave, MedicalRecord, Qualification, SalaryHistory, Training,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 업로드 파일 저장 디렉토리
    pub uploads_path: String,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

/// 전체 라우터를 구성합니다. 테스트에서도 같은 라우터를 사용합니다.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", post(auth::change_password));

    let employee_routes = Router::new()
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/employees/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/employees/{id}/profile", get(employees::get_profile))
        .route(
            "/employees/{id}/attachments",
            get(attachments::list_attachments).post(attachments::upload_attachment),
        )
        .route("/attachments/{id}", delete(attachments::delete_attachment));

    // 직원 하위 기록: /api/{resource}, /api/{resource}/{id}, /api/{resource}/{id}/document
    let record_routes = Router::new()
        .merge(records::resource_routes::<Qualification>())
        .merge(records::resource_routes::<Dependent>())
        .merge(records::resource_routes::<Training>())
        .merge(records::resource_routes::<MedicalRecord>())
        .merge(records::resource_routes::<SalaryHistory>())
        .merge(records::resource_routes::<BankDetail>())
        .merge(records::resource_routes::<Leave>())
        .merge(records::resource_routes::<Asset>())
        .route("/leaves/{id}/approve", post(leaves::approve_leave))
        .route("/leaves/{id}/reject", post(leaves::reject_leave));

    let self_service_routes = Router::new()
        .route("/me/employee", get(employees::my_employee))
        .route("/me/leaves", get(leaves::my_leaves).post(leaves::apply_leave));

    let admin_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user).patch(users::update_user));

    let migration_routes = Router::new()
        .route("/migration/import", post(migration::import))
        .route("/migration/status", get(migration::status));

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .merge(auth_routes)
        .merge(employee_routes)
        .merge(record_routes)
        .merge(self_service_routes)
        .merge(admin_routes)
        .merge(migration_routes)
        .with_state(state.clone());

    // 개발 환경에서는 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(&state.uploads_path))
        // axum 추출기별 기본 제한(2MB) 대신 전체 요청에 하나의 제한을 적용합니다.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
