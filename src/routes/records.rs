//! # 직원 하위 기록 라우트 핸들러
//!
//! `Resource`를 구현한 기록마다 아래 경로가 만들어집니다 (`{resource}`는 `Resource::PATH`).
//!
//! ## 엔드포인트
//! - `GET    /api/{resource}?employee_id=` → 목록 `{ "items": [...] }`
//! - `POST   /api/{resource}`              → 생성 (본문에 `employee_id` 포함)
//! - `GET    /api/{resource}/{id}`         → 조회
//! - `PUT    /api/{resource}/{id}`         → 수정 (포함된 필드만)
//! - `DELETE /api/{resource}/{id}`         → 삭제
//! - `POST   /api/{resource}/{id}/document` → 증빙서류 업로드 (문서 컬럼이 있는 기록만)

use crate::{
    db,
    error::AppError,
    middleware::StaffUser,
    models::{CreateRecord, RecordQuery, Resource},
    routes::{attachments::read_upload, AppState},
    services::files::{self, DOCUMENTS_DIR},
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

/// `R`의 CRUD 경로를 담은 라우터
pub fn resource_routes<R: Resource>() -> Router<AppState> {
    let router = Router::new()
        .route(&format!("/{}", R::PATH), get(list::<R>).post(create::<R>))
        .route(
            &format!("/{}/{{id}}", R::PATH),
            get(get_one::<R>).put(update::<R>).delete(remove::<R>),
        );

    if R::DOCUMENT_COLUMN.is_some() {
        router.route(
            &format!("/{}/{{id}}/document", R::PATH),
            post(upload_document::<R>),
        )
    } else {
        router
    }
}

async fn list<R: Resource>(
    _staff: StaffUser,
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> Result<Json<Value>, AppError> {
    let items = db::records::list::<R>(&state.pool, query.employee_id).await?;
    Ok(Json(json!({ "items": items })))
}

async fn get_one<R: Resource>(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<R>, AppError> {
    let record = db::records::get::<R>(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

async fn create<R: Resource>(
    _staff: StaffUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRecord<R::Payload>>,
) -> Result<(StatusCode, Json<R>), AppError> {
    // 외래키 위반(400)보다 먼저, 없는 직원은 404로 응답합니다.
    if db::employees::get_employee(&state.pool, req.employee_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let record = db::records::create::<R>(&state.pool, req.employee_id, &req.fields).await?;
    tracing::debug!(table = R::TABLE, id = record.id(), "Record created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<R: Resource>(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<R::Payload>,
) -> Result<Json<R>, AppError> {
    let record = db::records::update::<R>(&state.pool, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

async fn remove<R: Resource>(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let record = db::records::get::<R>(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !db::records::delete::<R>(&state.pool, id).await? {
        return Err(AppError::NotFound);
    }
    if let Some(path) = record.document_path() {
        files::remove_public_path(&state.uploads_path, path).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// 증빙서류를 업로드합니다. 이전 파일이 있으면 새 파일로 바꾸고 지웁니다.
async fn upload_document<R: Resource>(
    _staff: StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<R>, AppError> {
    let record = db::records::get::<R>(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let upload = read_upload(multipart).await?;
    let stored = files::save_bytes(
        &state.uploads_path,
        DOCUMENTS_DIR,
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
        &upload.bytes,
    )
    .await?;

    if let Err(e) = db::records::set_document::<R>(&state.pool, id, &stored.public_path).await {
        files::remove_public_path(&state.uploads_path, &stored.public_path).await;
        return Err(e);
    }
    if let Some(previous) = record.document_path() {
        files::remove_public_path(&state.uploads_path, previous).await;
    }

    let updated = db::records::get::<R>(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(updated))
}
