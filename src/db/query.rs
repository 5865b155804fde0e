//! # 행 단위 쿼리 헬퍼
//!
//! 파라미터가 동적으로 결정되는 SQL 문장(`Statement`)을 실행하는 함수들입니다.
//! 테이블마다 컬럼 구성이 다른 직원 하위 기록(학력, 계좌 등)의 공통 CRUD와
//! 트랜잭션 헬퍼가 이 모듈을 사용합니다.
//!
//! - `fetch_rows`: 여러 행 조회
//! - `fetch_one`: 0 또는 1 행 조회
//! - `execute`: INSERT/UPDATE/DELETE 실행 후 메타데이터(마지막 삽입 ID, 영향받은 행 수) 반환

use crate::error::AppError;
use serde::Serialize;
use sqlx::{
    query::{Query, QueryAs},
    sqlite::{SqliteArguments, SqliteQueryResult, SqliteRow},
    FromRow, Sqlite, SqliteConnection, SqlitePool,
};

/// SQL `?` 자리에 바인딩할 값
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    /// 같은 트랜잭션에서 앞서 실행된 n번째 문장이 삽입한 행의 ID.
    /// 트랜잭션 헬퍼 안에서만 사용할 수 있습니다.
    InsertedId(usize),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Real(value)
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        SqlParam::Bool(value)
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlParam::Null, Into::into)
    }
}

/// 실행할 SQL 한 문장과 그 파라미터
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// 다음 `?` 자리에 들어갈 값을 추가합니다.
    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }
}

/// `execute` 결과 메타데이터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementOutcome {
    /// 마지막으로 삽입된 행의 ID (INSERT가 아니면 이전 값이 그대로 남을 수 있음)
    pub last_insert_id: i64,
    pub rows_affected: u64,
}

impl From<SqliteQueryResult> for StatementOutcome {
    fn from(result: SqliteQueryResult) -> Self {
        Self {
            last_insert_id: result.last_insert_rowid(),
            rows_affected: result.rows_affected(),
        }
    }
}

/// `InsertedId`를 앞선 문장들의 결과로 치환합니다.
///
/// `prior`에는 현재 문장보다 앞에서 실행된 문장들의 결과만 들어 있으므로,
/// 범위를 벗어난 인덱스는 아직 실행되지 않은(또는 존재하지 않는) 문장을 가리킵니다.
fn resolve(params: &[SqlParam], prior: &[StatementOutcome]) -> Result<Vec<SqlParam>, AppError> {
    params
        .iter()
        .map(|param| match param {
            SqlParam::InsertedId(index) => prior
                .get(*index)
                .map(|outcome| SqlParam::Int(outcome.last_insert_id))
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "inserted id of statement {} is not available",
                        index
                    ))
                }),
            other => Ok(other.clone()),
        })
        .collect()
}

fn bind_query<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: Vec<SqlParam>,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlParam::Null => query.bind(None::<String>),
            SqlParam::Int(v) => query.bind(v),
            SqlParam::Real(v) => query.bind(v),
            SqlParam::Text(v) => query.bind(v),
            SqlParam::Bool(v) => query.bind(v),
            // resolve()에서 모두 치환됨
            SqlParam::InsertedId(_) => query.bind(None::<i64>),
        };
    }
    query
}

fn bind_query_as<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: Vec<SqlParam>,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlParam::Null => query.bind(None::<String>),
            SqlParam::Int(v) => query.bind(v),
            SqlParam::Real(v) => query.bind(v),
            SqlParam::Text(v) => query.bind(v),
            SqlParam::Bool(v) => query.bind(v),
            SqlParam::InsertedId(_) => query.bind(None::<i64>),
        };
    }
    query
}

/// 문장을 실행하고 모든 결과 행을 `T`로 변환하여 반환합니다.
pub async fn fetch_rows<T>(pool: &SqlitePool, stmt: &Statement) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let params = resolve(&stmt.params, &[])?;
    let rows = bind_query_as(sqlx::query_as::<_, T>(&stmt.sql), params)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// 문장을 실행하고 첫 번째 행을 반환합니다. 결과가 없으면 `None`.
pub async fn fetch_one<T>(pool: &SqlitePool, stmt: &Statement) -> Result<Option<T>, AppError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let params = resolve(&stmt.params, &[])?;
    let row = bind_query_as(sqlx::query_as::<_, T>(&stmt.sql), params)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// 문장을 실행하고 결과 메타데이터를 반환합니다.
pub async fn execute(pool: &SqlitePool, stmt: &Statement) -> Result<StatementOutcome, AppError> {
    let params = resolve(&stmt.params, &[])?;
    let result = bind_query(sqlx::query(&stmt.sql), params)
        .execute(pool)
        .await?;
    Ok(result.into())
}

/// 이미 확보한 커넥션(트랜잭션) 위에서 문장을 실행합니다.
/// `prior`는 같은 트랜잭션에서 앞서 실행된 문장들의 결과입니다.
pub(crate) async fn execute_on(
    conn: &mut SqliteConnection,
    stmt: &Statement,
    prior: &[StatementOutcome],
) -> Result<StatementOutcome, AppError> {
    let params = resolve(&stmt.params, prior)?;
    let result = bind_query(sqlx::query(&stmt.sql), params)
        .execute(conn)
        .await?;
    Ok(result.into())
}
