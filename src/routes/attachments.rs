//! # 직원 첨부파일 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/employees/{id}/attachments` → 첨부파일 목록
//! - `POST   /api/employees/{id}/attachments` → 업로드 (multipart: `file`, 선택 `category`)
//! - `DELETE /api/attachments/{id}`           → 행과 파일 삭제

use crate::{
    db::{self, attachments::NewAttachment},
    error::AppError,
    middleware::StaffUser,
    models::EmployeeAttachment,
    routes::AppState,
    services::files::{self, ATTACHMENTS_DIR},
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// multipart 요청에서 읽은 파일과 텍스트 필드
#[derive(Debug, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub category: Option<String>,
}

/// `file` 필드(필수)와 `category` 필드(선택)를 읽습니다. 나머지 필드는 무시합니다.
pub async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();
    let mut has_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                upload.bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec();
                has_file = true;
            }
            Some("category") => {
                let category = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read category: {}", e)))?;
                upload.category = Some(category).filter(|c| !c.trim().is_empty());
            }
            _ => {}
        }
    }

    if !has_file {
        return Err(AppError::BadRequest(
            "No file provided. Use the field name 'file'.".to_string(),
        ));
    }
    Ok(upload)
}

pub async fn list_attachments(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if db::employees::get_employee(&state.pool, employee_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }
    let attachments = db::attachments::list_for_employee(&state.pool, employee_id).await?;
    Ok(Json(json!({ "attachments": attachments })))
}

pub async fn upload_attachment(
    StaffUser(actor): StaffUser,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EmployeeAttachment>), AppError> {
    if db::employees::get_employee(&state.pool, employee_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let upload = read_upload(multipart).await?;
    let file_name = upload
        .file_name
        .clone()
        .unwrap_or_else(|| "attachment".to_string());

    let stored = files::save_bytes(
        &state.uploads_path,
        ATTACHMENTS_DIR,
        Some(&file_name),
        upload.content_type.as_deref(),
        &upload.bytes,
    )
    .await?;

    let created = db::attachments::create_attachment(
        &state.pool,
        employee_id,
        &NewAttachment {
            file_name: &file_name,
            file_path: &stored.public_path,
            mime_type: stored.mime_type.as_deref(),
            file_size: stored.size,
            category: upload.category.as_deref(),
            uploaded_by: Some(actor.user_id),
        },
    )
    .await;

    match created {
        Ok(attachment) => {
            tracing::info!(
                attachment_id = attachment.id,
                employee_id,
                size = attachment.file_size,
                "Attachment uploaded"
            );
            Ok((StatusCode::CREATED, Json(attachment)))
        }
        Err(e) => {
            files::remove_public_path(&state.uploads_path, &stored.public_path).await;
            Err(e)
        }
    }
}

pub async fn delete_attachment(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let attachment = db::attachments::get_attachment(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !db::attachments::delete_attachment(&state.pool, id).await? {
        return Err(AppError::NotFound);
    }
    files::remove_public_path(&state.uploads_path, &attachment.file_path).await;

    Ok(StatusCode::NO_CONTENT)
}
