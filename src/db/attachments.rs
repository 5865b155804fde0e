use crate::{error::AppError, models::EmployeeAttachment};
use sqlx::SqlitePool;

const ATTACHMENT_COLUMNS: &str = "id, employee_id, file_name, file_path, mime_type, file_size, \
    category, uploaded_by, created_at, updated_at";

pub async fn list_for_employee(
    pool: &SqlitePool,
    employee_id: i64,
) -> Result<Vec<EmployeeAttachment>, AppError> {
    let attachments = sqlx::query_as::<_, EmployeeAttachment>(&format!(
        "SELECT {} FROM employee_attachments WHERE employee_id = ? ORDER BY created_at DESC, id DESC",
        ATTACHMENT_COLUMNS
    ))
    .bind(employee_id)
    .fetch_all(pool)
    .await?;

    Ok(attachments)
}

pub async fn get_attachment(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<EmployeeAttachment>, AppError> {
    let attachment = sqlx::query_as::<_, EmployeeAttachment>(&format!(
        "SELECT {} FROM employee_attachments WHERE id = ?",
        ATTACHMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(attachment)
}

/// 저장이 끝난 파일의 메타데이터
pub struct NewAttachment<'a> {
    pub file_name: &'a str,
    pub file_path: &'a str,
    pub mime_type: Option<&'a str>,
    pub file_size: i64,
    pub category: Option<&'a str>,
    pub uploaded_by: Option<i64>,
}

pub async fn create_attachment(
    pool: &SqlitePool,
    employee_id: i64,
    new: &NewAttachment<'_>,
) -> Result<EmployeeAttachment, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO employee_attachments
            (employee_id, file_name, file_path, mime_type, file_size, category, uploaded_by)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(new.file_name)
    .bind(new.file_path)
    .bind(new.mime_type)
    .bind(new.file_size)
    .bind(new.category)
    .bind(new.uploaded_by)
    .execute(pool)
    .await?;

    get_attachment(pool, result.last_insert_rowid())
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created attachment".to_string()))
}

/// 첨부파일 행을 삭제합니다. 삭제된 행이 없으면 `false`.
pub async fn delete_attachment(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM employee_attachments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
