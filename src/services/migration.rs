//! # localStorage 데이터 이관 서비스
//!
//! 예전 브라우저 클라이언트가 보관하던 직원 기록을 DB로 옮깁니다.
//!
//! 직원 한 명 단위로:
//! 1. base64 증빙서류/첨부파일을 `uploads/migrated/`에 저장
//! 2. 직원 INSERT와 모든 하위 기록 INSERT를 하나의 배치로 만들어 트랜잭션 실행
//!    (하위 기록은 `InsertedId(0)`으로 방금 만든 직원을 참조)
//! 3. 실패하면 1에서 쓴 파일을 지우고 실패로 보고한 뒤 다음 직원으로 넘어감
//!
//! 이미 같은 사번이 있는 직원은 아무것도 쓰지 않고 건너뜁니다.

use crate::{
    db::{self, SqlParam, Statement},
    error::AppError,
    models::{
        Asset, BankDetail, Dependent, ImportFailure, ImportReport, ImportRequest, LegacyAttachment,
        LegacyEmployee, LegacyLeave, LegacyRecord, Leave, MedicalRecord, Qualification, Resource,
        SalaryHistory, Training,
    },
    services::files::{self, MIGRATED_DIR},
};
use sqlx::SqlitePool;

/// 직원 한 명을 옮기기 위한 문장 배치와, 그 과정에서 저장한 파일들
#[derive(Debug, Default)]
pub struct PreparedImport {
    pub statements: Vec<Statement>,
    pub files: Vec<String>,
}

/// 배치의 첫 문장(직원 INSERT)이 만든 ID
const EMPLOYEE: SqlParam = SqlParam::InsertedId(0);

/// 요청에 담긴 모든 직원을 이관합니다. 직원 하나의 실패는 다른 직원에 영향을 주지 않습니다.
pub async fn import_employees(
    pool: &SqlitePool,
    uploads_path: &str,
    importer_id: i64,
    request: &ImportRequest,
) -> Result<ImportReport, AppError> {
    let mut report = ImportReport::default();

    for (index, legacy) in request.employees.iter().enumerate() {
        let employee_code = legacy.employee.employee_code.clone();

        if let Some(code) = &employee_code {
            if db::employees::exists_by_code(pool, code).await? {
                tracing::info!(index, employee_code = %code, "Skipping already imported employee");
                report.skipped.push(code.clone());
                continue;
            }
        }

        let result = match prepare_employee(uploads_path, importer_id, legacy).await {
            Ok(prepared) => match db::run_transaction(pool, &prepared.statements).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    files::remove_all(uploads_path, &prepared.files).await;
                    Err(e)
                }
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => report.imported += 1,
            Err(e) => {
                tracing::warn!(index, "Failed to import employee: {}", e);
                report.failed.push(ImportFailure {
                    index,
                    employee_code,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        imported = report.imported,
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Migration import finished"
    );
    Ok(report)
}

/// 직원 한 명의 배치를 만듭니다. 실패하면 이미 저장한 파일을 지우고 에러를 돌려줍니다.
pub async fn prepare_employee(
    uploads_path: &str,
    importer_id: i64,
    legacy: &LegacyEmployee,
) -> Result<PreparedImport, AppError> {
    let mut prepared = PreparedImport::default();
    match fill(uploads_path, importer_id, legacy, &mut prepared).await {
        Ok(()) => Ok(prepared),
        Err(e) => {
            files::remove_all(uploads_path, &prepared.files).await;
            Err(e)
        }
    }
}

async fn fill(
    uploads_path: &str,
    importer_id: i64,
    legacy: &LegacyEmployee,
    prepared: &mut PreparedImport,
) -> Result<(), AppError> {
    legacy.employee.validate_create()?;
    prepared
        .statements
        .push(db::employees::insert_statement(&legacy.employee, SqlParam::Null));

    push_records::<Qualification>(uploads_path, &legacy.qualifications, prepared).await?;
    push_records::<Dependent>(uploads_path, &legacy.dependents, prepared).await?;
    push_records::<Training>(uploads_path, &legacy.trainings, prepared).await?;
    push_records::<MedicalRecord>(uploads_path, &legacy.medical_records, prepared).await?;
    push_records::<SalaryHistory>(uploads_path, &legacy.salary_history, prepared).await?;
    push_records::<BankDetail>(uploads_path, &legacy.bank_details, prepared).await?;
    push_leaves(&legacy.leaves, prepared)?;
    push_records::<Asset>(uploads_path, &legacy.assets, prepared).await?;

    for attachment in &legacy.attachments {
        push_attachment(uploads_path, importer_id, attachment, prepared).await?;
    }
    Ok(())
}

async fn push_records<R: Resource>(
    uploads_path: &str,
    records: &[LegacyRecord<R::Payload>],
    prepared: &mut PreparedImport,
) -> Result<(), AppError> {
    for record in records {
        R::validate_create(&record.fields)?;
        let mut assignments = R::assignments(&record.fields, None);

        if let Some(data) = &record.document {
            match R::DOCUMENT_COLUMN {
                Some(column) => {
                    let stored = files::save_base64(
                        uploads_path,
                        MIGRATED_DIR,
                        record.document_name.as_deref(),
                        data,
                    )
                    .await?;
                    assignments.push((column, SqlParam::Text(stored.public_path.clone())));
                    prepared.files.push(stored.public_path);
                }
                None => tracing::warn!(table = R::TABLE, "Ignoring document on record without a document field"),
            }
        }

        prepared
            .statements
            .push(db::records::insert_statement::<R>(EMPLOYEE, assignments));
    }
    Ok(())
}

/// 휴가는 이관 당시의 상태(approved 등)를 그대로 유지합니다.
fn push_leaves(leaves: &[LegacyLeave], prepared: &mut PreparedImport) -> Result<(), AppError> {
    for leave in leaves {
        Leave::validate_create(&leave.fields)?;
        let mut assignments = Leave::assignments(&leave.fields, None);
        if let Some(status) = leave.status {
            assignments.push(("status", SqlParam::Text(status.as_str().to_string())));
        }
        prepared
            .statements
            .push(db::records::insert_statement::<Leave>(EMPLOYEE, assignments));
    }
    Ok(())
}

async fn push_attachment(
    uploads_path: &str,
    importer_id: i64,
    attachment: &LegacyAttachment,
    prepared: &mut PreparedImport,
) -> Result<(), AppError> {
    let stored = files::save_base64(
        uploads_path,
        MIGRATED_DIR,
        Some(&attachment.file_name),
        &attachment.data,
    )
    .await?;
    prepared.files.push(stored.public_path.clone());

    let mime_type = attachment.mime_type.clone().or(stored.mime_type);
    prepared.statements.push(
        Statement::new(
            "INSERT INTO employee_attachments \
             (employee_id, file_name, file_path, mime_type, file_size, category, uploaded_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(EMPLOYEE)
        .bind(attachment.file_name.as_str())
        .bind(stored.public_path)
        .bind(mime_type)
        .bind(stored.size)
        .bind(attachment.category.clone())
        .bind(importer_id),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy(value: serde_json::Value) -> LegacyEmployee {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn batch_starts_with_employee_and_links_children() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let record = legacy(json!({
            "employee_code": "L-1",
            "first_name": "Jisoo",
            "last_name": "Yoon",
            "qualifications": [{
                "degree": "BA",
                "institution": "SNU",
                "document": "data:application/pdf;base64,JVBERi0=",
                "document_name": "diploma.pdf"
            }],
            "leaves": [{
                "leave_type": "annual",
                "start_date": "2025-12-24",
                "end_date": "2025-12-26",
                "status": "approved"
            }]
        }));

        let prepared = prepare_employee(root, 1, &record).await.unwrap();
        assert_eq!(prepared.statements.len(), 3);
        assert!(prepared.statements[0].sql.starts_with("INSERT INTO employees"));
        assert_eq!(prepared.statements[1].params[0], SqlParam::InsertedId(0));
        assert!(prepared.statements[2]
            .params
            .contains(&SqlParam::Text("approved".into())));
        assert!(prepared.statements[2].params.contains(&SqlParam::Int(3)));

        assert_eq!(prepared.files.len(), 1);
        assert!(prepared.files[0].starts_with("/uploads/migrated/"));
        assert!(prepared.files[0].ends_with("-diploma.pdf"));
        assert!(files::disk_path(root, &prepared.files[0]).unwrap().exists());
    }

    #[tokio::test]
    async fn failure_after_upload_removes_written_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let record = legacy(json!({
            "employee_code": "L-2",
            "first_name": "Dami",
            "last_name": "Ko",
            "attachments": [
                { "file_name": "contract.pdf", "data": "JVBERi0=" },
                { "file_name": "broken.pdf", "data": "@@not-base64@@" }
            ]
        }));

        assert!(prepare_employee(root, 1, &record).await.is_err());
        let migrated = dir.path().join(MIGRATED_DIR);
        let leftover = std::fs::read_dir(&migrated).map(|d| d.count()).unwrap_or(0);
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn invalid_child_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let record = legacy(json!({
            "employee_code": "L-3",
            "first_name": "Nari",
            "last_name": "Seo",
            "salary_history": [{ "effective_date": "2026-01-01", "basic_salary": -5 }]
        }));
        let err = prepare_employee(dir.path().to_str().unwrap(), 1, &record)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
