use super::{run_transaction, SqlParam, Statement};
use crate::error::AppError;
use crate::models::user::{Role, UpdateUserRequest, User};
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, is_active, last_login, created_at, updated_at";

pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, role)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .execute(pool)
    .await?;

    find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = ?",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
        .fetch_all(pool)
        .await?;

    Ok(users)
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// 관리자에 의한 계정 수정. 포함된 필드만 변경합니다.
///
/// 컬럼 변경과 (비활성화 시) 리프레시 토큰 폐기가 한 트랜잭션으로 실행되어,
/// 이메일 중복 등으로 실패하면 아무것도 바뀌지 않습니다.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    req: &UpdateUserRequest,
) -> Result<Option<User>, AppError> {
    if find_by_id(pool, id).await?.is_none() {
        return Ok(None);
    }

    let mut sql = String::from("UPDATE users SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");
    let mut params = Vec::new();
    if let Some(email) = &req.email {
        sql.push_str(", email = ?");
        params.push(SqlParam::from(email.as_str()));
    }
    if let Some(role) = req.role {
        sql.push_str(", role = ?");
        params.push(SqlParam::from(role.as_str()));
    }
    if let Some(is_active) = req.is_active {
        sql.push_str(", is_active = ?");
        params.push(SqlParam::from(is_active));
    }
    sql.push_str(" WHERE id = ?");
    params.push(SqlParam::Int(id));

    let mut statements = vec![Statement { sql, params }];
    // 비활성화된 계정은 토큰 갱신도 막습니다.
    if req.is_active == Some(false) {
        statements.push(Statement::new("DELETE FROM refresh_tokens WHERE user_id = ?").bind(id));
    }
    run_transaction(pool, &statements).await?;

    find_by_id(pool, id).await
}

pub async fn update_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// 인증에 성공할 때마다 마지막 로그인 시각을 갱신합니다.
pub async fn touch_last_login(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET last_login = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn store_refresh_token(
    pool: &SqlitePool,
    user_id: i64,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_refresh_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<(i64, i64, String)>, AppError> {
    let row = sqlx::query_as::<_, (i64, i64, String)>(
        r#"
        SELECT id, user_id, expires_at
        FROM refresh_tokens
        WHERE token_hash = ?
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_refresh_token(pool: &SqlitePool, token_hash: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_user_refresh_tokens(pool: &SqlitePool, user_id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
