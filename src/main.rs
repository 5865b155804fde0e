//! # hrdesk 웹 서버 진입점
//!
//! 이 파일은 hrdesk 애플리케이션의 **시작점(entry point)**입니다.
//! 라우터, 핸들러, DB 접근 코드는 모두 라이브러리 크레이트(`src/lib.rs`)에 있고,
//! 이 파일은 설정을 읽어 그것들을 조립한 뒤 서버를 띄우기만 합니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩
//! 4. SQLite 연결 풀 생성과 스키마 마이그레이션
//! 5. 업로드 디렉토리 생성
//! 6. 첫 관리자 계정 생성 (설정된 경우)
//! 7. API 라우터 설정과 HTTP 서버 시작

// ── 외부 크레이트 및 모듈에서 필요한 항목 가져오기 ──
// `hrdesk::...`는 같은 패키지의 라이브러리 크레이트(src/lib.rs)를 가리킵니다.
// 바이너리와 통합 테스트(tests/)가 같은 라우터를 쓰기 위해 이렇게 나눴습니다.
use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use hrdesk::{config::Config, db, routes, services};
use std::path::Path; // 파일 경로를 다루는 표준 라이브러리 타입
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: 비동기 런타임(Tokio)을 만들고 main을 그 안에서 실행하는 어트리뷰트 매크로
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok()는 Result를 Option으로 바꿔 버립니다. .env 파일이 없어도 시스템 환경변수로 동작합니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // registry()에 필터와 포맷터를 레이어처럼 쌓아 전역 로거로 등록합니다.
    tracing_subscriber::registry()
        .with(
            // RUST_LOG가 없으면 hrdesk, tower_http, axum을 debug 레벨로 출력합니다.
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrdesk=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init();

    // ── 3단계: 설정 로딩 ──
    // `?`: DATABASE_URL이나 JWT_SECRET이 없으면 여기서 에러를 반환하고 종료합니다.
    let config = Config::from_env()?;
    tracing::info!("Starting hrdesk server on {}:{}", config.host, config.port);

    // ── 4단계: 연결 풀 생성 + migrations/ 적용 ──
    // db::connect가 파일 생성, 외래키 활성화, 마이그레이션까지 처리합니다.
    let pool = db::connect(&config.database_url).await?;

    // ── 5단계: 업로드 디렉토리 생성 ──
    // 첨부파일과 이관된 증빙서류가 이 아래에 저장되고 `/uploads`로 서빙됩니다.
    let uploads_path = Path::new(&config.uploads_path);
    if !uploads_path.exists() {
        // create_dir_all: 중간 디렉토리까지 모두 생성 (mkdir -p와 같음)
        tokio::fs::create_dir_all(uploads_path).await?;
        tracing::info!("Created uploads directory: {}", config.uploads_path);
    }

    // ── 6단계: 첫 관리자 계정 ──
    // 회원가입은 항상 employee 역할이므로, 관리자는 환경변수로만 만들 수 있습니다.
    match &config.bootstrap_admin {
        Some(admin) => {
            services::bootstrap::ensure_admin(&pool, admin).await?;
        }
        None => {
            if db::users::count_users(&pool).await? == 0 {
                tracing::warn!(
                    "No users exist and ADMIN_USERNAME/ADMIN_PASSWORD are not set; \
                     registered users get the employee role only"
                );
            }
        }
    }

    // ── 7단계: 애플리케이션 상태(State)와 라우터 ──
    // SqlitePool은 내부적으로 Arc를 사용하므로 State로 넘겨도 같은 풀을 공유합니다.
    // String 값들은 .clone()으로 복제해 config와 소유권을 나눕니다.
    let state = routes::AppState {
        pool,
        uploads_path: config.uploads_path.clone(),
        jwt_secret: config.jwt_secret.clone(),
        access_token_minutes: config.access_token_minutes,
        refresh_token_days: config.refresh_token_days,
    };
    let app = routes::router(state, config.max_upload_bytes);

    // ── 8단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    // TcpListener::bind(): 지정된 주소에서 요청 대기를 시작합니다.
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // axum::serve(): Ctrl+C로 종료할 때까지 요청을 처리합니다.
    axum::serve(listener, app).await?;

    Ok(())
}
