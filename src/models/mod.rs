//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `user`: 사용자 계정, 역할, 인증 요청/응답
//! - `employee`: 직원 엔티티와 전체 프로필
//! - `records`: 직원 하위 기록들과 공통 `Resource` 트레이트
//! - `attachment`: 직원 첨부파일
//! - `migration`: localStorage 데이터 이관 요청/결과

pub mod attachment;
pub mod employee;
pub mod migration;
pub mod records;
pub mod user;

pub use attachment::*;
pub use employee::*;
pub use migration::*;
pub use records::*;
pub use user::*;
