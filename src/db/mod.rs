//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `query`: 동적 파라미터 문장 실행 헬퍼
//! - `transaction`: 여러 문장을 하나의 트랜잭션으로 실행하는 헬퍼
//! - `users`: 사용자 계정, 리프레시 토큰 쿼리
//! - `employees`: 직원 CRUD와 연쇄 삭제
//! - `records`: 직원 하위 기록(학력, 부양가족, 교육 등)의 공통 CRUD
//! - `leaves`: 휴가 승인/반려
//! - `attachments`: 직원 첨부파일 쿼리

pub mod attachments;
pub mod employees;
pub mod leaves;
pub mod query;
pub mod records;
pub mod transaction;
pub mod users;

pub use query::{execute, fetch_one, fetch_rows, SqlParam, Statement, StatementOutcome};
pub use transaction::run_transaction;

use crate::error::AppError;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;

/// ./migrations 폴더의 SQL 파일들을 컴파일 타임에 포함합니다.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 데이터베이스에 연결하고 스키마 마이그레이션을 적용합니다.
///
/// 파일이 없으면 새로 만들고, 외래키 제약(ON DELETE CASCADE 등)을 켭니다.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("Running database migrations...");
    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

    Ok(pool)
}

/// 테스트용 인메모리 데이터베이스.
///
/// 인메모리 SQLite는 커넥션마다 별도의 DB가 되므로 커넥션을 하나만 두고,
/// 유휴 시간이 지나도 닫히지 않게 합니다.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

    Ok(pool)
}

/// 이관 상태 확인용 테이블별 행 수
pub const COUNTED_TABLES: [&str; 11] = [
    "users",
    "employees",
    "qualifications",
    "dependents",
    "trainings",
    "medical_records",
    "salary_history",
    "bank_details",
    "leaves",
    "assets",
    "employee_attachments",
];

pub async fn table_counts(
    pool: &SqlitePool,
) -> Result<std::collections::BTreeMap<&'static str, i64>, AppError> {
    let mut counts = std::collections::BTreeMap::new();
    for table in COUNTED_TABLES {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await?;
        counts.insert(table, count);
    }
    Ok(counts)
}
