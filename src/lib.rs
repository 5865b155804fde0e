//! # hrdesk
//!
//! 인사관리(HR) REST API 서버 라이브러리입니다.
//! 실행 바이너리(`main.rs`)와 통합 테스트(`tests/`)가 같은 라우터를 사용합니다.
//!
//! - `config`: 환경변수 설정
//! - `db`: 데이터 접근 계층 (쿼리 헬퍼, 트랜잭션 헬퍼, 엔티티별 쿼리)
//! - `error`: `AppError`와 HTTP 응답 변환
//! - `middleware`: 인증 게이트와 역할 검사
//! - `models`: 엔티티와 요청/응답 구조체
//! - `routes`: 핸들러와 라우터
//! - `services`: 파일 저장, 비밀번호, 데이터 이관

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{router, AppState};
