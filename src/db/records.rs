//! # 직원 하위 기록 공통 쿼리
//!
//! `Resource`를 구현한 모든 기록(학력, 부양가족, 교육, 건강기록, 급여 이력,
//! 계좌, 휴가, 자산)에 대한 CRUD를 한 번만 구현합니다.
//! SQL은 테이블 이름과 컬럼 목록으로 조립하고, 값은 모두 `?`로 바인딩합니다.

use super::{
    query::{fetch_one, fetch_rows, SqlParam, Statement},
    transaction::run_transaction,
};
use crate::{error::AppError, models::Resource};
use sqlx::SqlitePool;

/// 목록 조회. `employee_id`가 있으면 해당 직원의 기록만 반환합니다.
pub async fn list<R: Resource>(
    pool: &SqlitePool,
    employee_id: Option<i64>,
) -> Result<Vec<R>, AppError> {
    let stmt = match employee_id {
        Some(employee_id) => Statement::new(format!(
            "SELECT {} FROM {} WHERE employee_id = ? ORDER BY {}",
            R::COLUMNS,
            R::TABLE,
            R::ORDER_BY
        ))
        .bind(employee_id),
        None => Statement::new(format!(
            "SELECT {} FROM {} ORDER BY {}",
            R::COLUMNS,
            R::TABLE,
            R::ORDER_BY
        )),
    };
    fetch_rows(pool, &stmt).await
}

pub async fn get<R: Resource>(pool: &SqlitePool, id: i64) -> Result<Option<R>, AppError> {
    let stmt = Statement::new(format!(
        "SELECT {} FROM {} WHERE id = ?",
        R::COLUMNS,
        R::TABLE
    ))
    .bind(id);
    fetch_one(pool, &stmt).await
}

/// INSERT 문장을 만듭니다.
///
/// `employee`는 직원 ID 값이며, 마이그레이션처럼 같은 트랜잭션에서 방금 만든 직원을
/// 가리킬 때는 `SqlParam::InsertedId`를 넘깁니다.
pub fn insert_statement<R: Resource>(
    employee: SqlParam,
    assignments: Vec<(&'static str, SqlParam)>,
) -> Statement {
    let mut columns = vec!["employee_id"];
    let mut stmt_params = vec![employee];
    for (column, value) in assignments {
        columns.push(column);
        stmt_params.push(value);
    }
    let placeholders = vec!["?"; columns.len()].join(", ");

    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            R::TABLE,
            columns.join(", "),
            placeholders
        ),
        params: stmt_params,
    }
}

/// 새 기록을 만듭니다. 부가 문장(주 계좌 해제 등)과 INSERT를 한 트랜잭션으로 실행합니다.
pub async fn create<R: Resource>(
    pool: &SqlitePool,
    employee_id: i64,
    payload: &R::Payload,
) -> Result<R, AppError> {
    R::validate_create(payload)?;

    let mut statements = R::companion_statements(payload, employee_id, None);
    let insert_index = statements.len();
    statements.push(insert_statement::<R>(
        SqlParam::Int(employee_id),
        R::assignments(payload, None),
    ));

    let outcomes = run_transaction(pool, &statements).await?;
    let id = outcomes[insert_index].last_insert_id;

    get(pool, id)
        .await?
        .ok_or(AppError::Internal(format!(
            "Failed to retrieve created {} row",
            R::TABLE
        )))
}

/// 기록을 부분 수정합니다. 기록이 없으면 `Ok(None)`.
pub async fn update<R: Resource>(
    pool: &SqlitePool,
    id: i64,
    payload: &R::Payload,
) -> Result<Option<R>, AppError> {
    let Some(current) = get::<R>(pool, id).await? else {
        return Ok(None);
    };
    R::validate_update(payload, &current)?;

    let assignments = R::assignments(payload, Some(&current));
    let mut statements = R::companion_statements(payload, current.employee_id(), Some(id));

    let mut sql = format!(
        "UPDATE {} SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        R::TABLE
    );
    let mut params = Vec::with_capacity(assignments.len() + 1);
    for (column, value) in assignments {
        sql.push_str(&format!(", {} = ?", column));
        params.push(value);
    }
    sql.push_str(" WHERE id = ?");
    params.push(SqlParam::Int(id));
    statements.push(Statement { sql, params });

    run_transaction(pool, &statements).await?;
    get(pool, id).await
}

/// 기록을 삭제합니다. 삭제된 행이 없으면 `false`.
pub async fn delete<R: Resource>(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let outcome = super::query::execute(
        pool,
        &Statement::new(format!("DELETE FROM {} WHERE id = ?", R::TABLE)).bind(id),
    )
    .await?;
    Ok(outcome.rows_affected > 0)
}

/// 업로드한 증빙서류 경로를 기록에 저장합니다.
pub async fn set_document<R: Resource>(
    pool: &SqlitePool,
    id: i64,
    public_path: &str,
) -> Result<(), AppError> {
    let column = R::DOCUMENT_COLUMN.ok_or_else(|| {
        AppError::BadRequest(format!("{} records do not accept documents", R::PATH))
    })?;

    super::query::execute(
        pool,
        &Statement::new(format!(
            "UPDATE {} SET {} = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
            R::TABLE,
            column
        ))
        .bind(public_path)
        .bind(id),
    )
    .await?;
    Ok(())
}
