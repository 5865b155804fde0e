//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `UPLOADS_PATH`: 첨부파일/증빙서류 저장 디렉토리
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `ACCESS_TOKEN_MINUTES`, `REFRESH_TOKEN_DAYS`: 토큰 수명
//! - `MAX_UPLOAD_BYTES`: 요청 본문 최대 크기
//! - `ADMIN_USERNAME`, `ADMIN_PASSWORD`, `ADMIN_EMAIL`: 첫 관리자 계정 (선택)

use std::env; // 환경변수를 읽는 표준 라이브러리 모듈

/// 애플리케이션 전체 설정을 담는 구조체
///
/// `#[derive(Debug, Clone)]`: Debug는 `{:?}` 출력을, Clone은 `.clone()` 복제를 자동 구현합니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/hrdesk.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 업로드 파일이 저장되는 디렉토리 경로. `/uploads`로 서빙됩니다.
    pub uploads_path: String,
    pub host: String,
    pub port: u16,
    /// 액세스 토큰 수명(분)
    pub access_token_minutes: i64,
    /// 리프레시 토큰 수명(일)
    pub refresh_token_days: i64,
    /// 요청 본문 최대 크기(바이트). 마이그레이션 요청의 base64 첨부 때문에 넉넉하게 잡습니다.
    pub max_upload_bytes: usize,
    /// users 테이블이 비어 있을 때 생성할 관리자 계정
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// 첫 관리자 계정 정보 (`ADMIN_*` 환경변수)
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

// impl 블록: Config 타입에 연결된 함수(메서드)를 정의합니다.
impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        // 관리자 계정은 사용자명과 비밀번호가 모두 있을 때만 사용합니다.
        let bootstrap_admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(BootstrapAdmin {
                email: env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{}@localhost", username)),
                username,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            // env::var()는 Result<String, VarError>를 반환합니다.
            // `?`: 값이 없으면 즉시 에러를 호출자에게 돌려줍니다.
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            // unwrap_or_else(|_| ...): 에러일 때 클로저를 실행해 기본값을 만듭니다.
            uploads_path: env::var("UPLOADS_PATH")
                .unwrap_or_else(|_| "data/uploads".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            // 숫자 설정은 parse_or가 문자열을 원하는 타입으로 변환합니다.
            port: parse_or("PORT", 3000),
            access_token_minutes: parse_or("ACCESS_TOKEN_MINUTES", 60),
            refresh_token_days: parse_or("REFRESH_TOKEN_DAYS", 7),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            bootstrap_admin,
        })
    }
}

/// 환경변수를 읽어 파싱하고, 없거나 파싱에 실패하면 기본값을 사용합니다.
///
/// `T: FromStr`: 문자열에서 만들 수 있는 타입(u16, i64, usize 등)이면 모두 받습니다.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok() // Result -> Option
        .and_then(|value| value.parse().ok()) // 파싱 실패도 None으로
        .unwrap_or(default)
}
