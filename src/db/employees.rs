//! # 직원 쿼리
//!
//! 직원 목록/검색, 계정과 함께 생성, 부분 수정, 하위 기록을 포함한 삭제,
//! 전체 인사 기록(profile) 조회를 담당합니다.

use super::{
    attachments,
    query::{fetch_one, fetch_rows, SqlParam, Statement},
    records,
    transaction::run_transaction,
};
use crate::{
    error::AppError,
    models::{
        Asset, BankDetail, Dependent, Employee, EmployeePayload, EmployeeProfile, EmployeeQuery,
        Leave, MedicalRecord, Qualification, Role, SalaryHistory, Training,
    },
};
use sqlx::SqlitePool;

pub const EMPLOYEE_COLUMNS: &str = "id, user_id, employee_code, first_name, last_name, email, \
    phone, date_of_birth, gender, department, designation, date_of_joining, employment_status, \
    address, created_at, updated_at";

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// 직원 삭제 시 함께 지우는 하위 테이블
pub const CHILD_TABLES: [&str; 9] = [
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

/// 필터와 페이지네이션을 적용한 직원 목록
pub async fn list_employees(
    pool: &SqlitePool,
    query: &EmployeeQuery,
) -> Result<Vec<Employee>, AppError> {
    let mut sql = format!("SELECT {} FROM employees WHERE 1 = 1", EMPLOYEE_COLUMNS);
    let mut params: Vec<SqlParam> = Vec::new();

    if let Some(department) = &query.department {
        sql.push_str(" AND department = ?");
        params.push(department.as_str().into());
    }
    if let Some(status) = &query.status {
        sql.push_str(" AND employment_status = ?");
        params.push(status.as_str().into());
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        sql.push_str(
            " AND (first_name LIKE ? OR last_name LIKE ? OR employee_code LIKE ? OR email LIKE ?)",
        );
        let pattern = format!("%{}%", q);
        for _ in 0..4 {
            params.push(pattern.as_str().into());
        }
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);
    sql.push_str(" ORDER BY last_name, first_name, id LIMIT ? OFFSET ?");
    params.push(limit.into());
    params.push(offset.into());

    fetch_rows(pool, &Statement { sql, params }).await
}

pub async fn get_employee(pool: &SqlitePool, id: i64) -> Result<Option<Employee>, AppError> {
    fetch_one(
        pool,
        &Statement::new(format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS)).bind(id),
    )
    .await
}

/// 로그인 계정에 연결된 직원
pub async fn find_by_user_id(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<Employee>, AppError> {
    fetch_one(
        pool,
        &Statement::new(format!(
            "SELECT {} FROM employees WHERE user_id = ?",
            EMPLOYEE_COLUMNS
        ))
        .bind(user_id),
    )
    .await
}

pub async fn exists_by_code(pool: &SqlitePool, employee_code: &str) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE employee_code = ?")
        .bind(employee_code)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// 직원 INSERT 문장. `user`는 연결할 계정 ID (없으면 `SqlParam::Null`).
pub fn insert_statement(payload: &EmployeePayload, user: SqlParam) -> Statement {
    let mut columns = vec!["user_id"];
    let mut params = vec![user];
    for (column, value) in payload.assignments() {
        columns.push(column);
        params.push(value);
    }
    Statement {
        sql: format!(
            "INSERT INTO employees ({}) VALUES ({})",
            columns.join(", "),
            vec!["?"; columns.len()].join(", ")
        ),
        params,
    }
}

/// 새로 만들 로그인 계정 (비밀번호는 이미 해시된 상태)
pub struct AccountInsert<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

/// 직원을 만듭니다. 계정이 함께 오면 계정 INSERT 후 직원 INSERT를 한 트랜잭션으로 실행합니다.
pub async fn create_employee(
    pool: &SqlitePool,
    payload: &EmployeePayload,
    account: Option<AccountInsert<'_>>,
) -> Result<Employee, AppError> {
    let statements = match account {
        Some(account) => vec![
            Statement::new(
                "INSERT INTO users (username, email, password_hash, role) VALUES (?, ?, ?, ?)",
            )
            .bind(account.username)
            .bind(account.email)
            .bind(account.password_hash)
            .bind(account.role.as_str()),
            insert_statement(payload, SqlParam::InsertedId(0)),
        ],
        None => vec![insert_statement(payload, SqlParam::Null)],
    };

    let outcomes = run_transaction(pool, &statements).await?;
    let id = outcomes
        .last()
        .map(|outcome| outcome.last_insert_id)
        .ok_or(AppError::Internal("Employee insert produced no result".to_string()))?;

    get_employee(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created employee".to_string()))
}

/// 직원 정보를 부분 수정합니다. 직원이 없으면 `Ok(None)`.
pub async fn update_employee(
    pool: &SqlitePool,
    id: i64,
    payload: &EmployeePayload,
) -> Result<Option<Employee>, AppError> {
    let mut sql =
        "UPDATE employees SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')".to_string();
    let mut params = Vec::new();
    for (column, value) in payload.assignments() {
        sql.push_str(&format!(", {} = ?", column));
        params.push(value);
    }
    sql.push_str(" WHERE id = ?");
    params.push(SqlParam::Int(id));

    let outcome = super::query::execute(pool, &Statement { sql, params }).await?;
    if outcome.rows_affected == 0 {
        return Ok(None);
    }
    get_employee(pool, id).await
}

/// 직원에 딸린 파일들의 공개 경로 (첨부파일, 학력/교육/건강기록 증빙)
pub async fn employee_file_paths(pool: &SqlitePool, id: i64) -> Result<Vec<String>, AppError> {
    let rows: Vec<(Option<String>,)> = sqlx::query_as(
        r#"
        SELECT file_path FROM employee_attachments WHERE employee_id = ?1
        UNION ALL SELECT document_path FROM qualifications WHERE employee_id = ?1
        UNION ALL SELECT certificate_path FROM trainings WHERE employee_id = ?1
        UNION ALL SELECT document_path FROM medical_records WHERE employee_id = ?1
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(|(path,)| path).collect())
}

/// 직원과 하위 기록을 한 트랜잭션으로 삭제하고, 연결된 계정은 비활성화합니다.
///
/// 삭제 후 지워야 할 파일 경로를 반환합니다. 직원이 없으면 `Ok(None)`.
pub async fn delete_employee(pool: &SqlitePool, id: i64) -> Result<Option<Vec<String>>, AppError> {
    if get_employee(pool, id).await?.is_none() {
        return Ok(None);
    }
    let files = employee_file_paths(pool, id).await?;

    let mut statements: Vec<Statement> = CHILD_TABLES
        .iter()
        .map(|table| Statement::new(format!("DELETE FROM {} WHERE employee_id = ?", table)).bind(id))
        .collect();
    // 계정은 지우지 않고 비활성화만 합니다. 토큰 갱신도 막습니다.
    statements.push(
        Statement::new(
            "UPDATE users SET is_active = 0, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
             WHERE id = (SELECT user_id FROM employees WHERE id = ?)",
        )
        .bind(id),
    );
    statements.push(
        Statement::new(
            "DELETE FROM refresh_tokens WHERE user_id = (SELECT user_id FROM employees WHERE id = ?)",
        )
        .bind(id),
    );
    statements.push(Statement::new("DELETE FROM employees WHERE id = ?").bind(id));

    let outcomes = run_transaction(pool, &statements).await?;
    if outcomes.last().map_or(0, |o| o.rows_affected) == 0 {
        // 조회와 삭제 사이에 다른 요청이 먼저 지운 경우
        return Ok(None);
    }
    Ok(Some(files))
}

/// 직원 한 명의 전체 인사 기록
pub async fn profile(pool: &SqlitePool, id: i64) -> Result<Option<EmployeeProfile>, AppError> {
    let Some(employee) = get_employee(pool, id).await? else {
        return Ok(None);
    };

    Ok(Some(EmployeeProfile {
        qualifications: records::list::<Qualification>(pool, Some(id)).await?,
        dependents: records::list::<Dependent>(pool, Some(id)).await?,
        trainings: records::list::<Training>(pool, Some(id)).await?,
        medical_records: records::list::<MedicalRecord>(pool, Some(id)).await?,
        salary_history: records::list::<SalaryHistory>(pool, Some(id)).await?,
        bank_details: records::list::<BankDetail>(pool, Some(id)).await?,
        leaves: records::list::<Leave>(pool, Some(id)).await?,
        assets: records::list::<Asset>(pool, Some(id)).await?,
        attachments: attachments::list_for_employee(pool, id).await?,
        employee,
    }))
}
