//! # 서비스 모듈
//!
//! HTTP와 DB 쿼리 사이의 로직을 담습니다.
//! - `files`: 업로드 파일 저장/삭제, base64 디코딩
//! - `password`: Argon2 비밀번호 해싱
//! - `migration`: localStorage 데이터 이관
//! - `bootstrap`: 첫 관리자 계정 생성

pub mod bootstrap;
pub mod files;
pub mod migration;
pub mod password;
