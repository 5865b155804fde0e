use serde::{Deserialize, Serialize};

/// 직원 첨부파일: 파일 자체는 업로드 디렉토리에, DB에는 경로만 저장합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeAttachment {
    pub id: i64,
    pub employee_id: i64,
    /// 업로드 당시의 원래 파일 이름
    pub file_name: String,
    /// 공개 경로 (`/uploads/attachments/...`)
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: i64,
    /// 분류 (contract, id_card, resume ...)
    pub category: Option<String>,
    pub uploaded_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}
