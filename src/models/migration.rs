//! # 로컬 데이터 이관(migration) 모델
//!
//! 예전 브라우저 클라이언트가 localStorage에 보관하던 직원 기록의 모양입니다.
//! 필드 이름은 현재 API와 같고, 하위 기록이 직원 안에 배열로 중첩되어 있습니다.
//! 증빙서류와 첨부파일은 base64 문자열(또는 `data:<mime>;base64,...` 형태의 data URL)입니다.

use super::{
    employee::EmployeePayload,
    records::{
        AssetPayload, BankDetailPayload, DependentPayload, LeavePayload, LeaveStatus,
        MedicalRecordPayload, QualificationPayload, SalaryHistoryPayload, TrainingPayload,
    },
};
use serde::{Deserialize, Serialize};

/// `POST /api/migration/import` 요청 본문
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub employees: Vec<LegacyEmployee>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyEmployee {
    #[serde(flatten)]
    pub employee: EmployeePayload,
    #[serde(default)]
    pub qualifications: Vec<LegacyRecord<QualificationPayload>>,
    #[serde(default)]
    pub dependents: Vec<LegacyRecord<DependentPayload>>,
    #[serde(default)]
    pub trainings: Vec<LegacyRecord<TrainingPayload>>,
    #[serde(default)]
    pub medical_records: Vec<LegacyRecord<MedicalRecordPayload>>,
    #[serde(default)]
    pub salary_history: Vec<LegacyRecord<SalaryHistoryPayload>>,
    #[serde(default)]
    pub bank_details: Vec<LegacyRecord<BankDetailPayload>>,
    #[serde(default)]
    pub leaves: Vec<LegacyLeave>,
    #[serde(default)]
    pub assets: Vec<LegacyRecord<AssetPayload>>,
    #[serde(default)]
    pub attachments: Vec<LegacyAttachment>,
}

/// 하위 기록 하나. 증빙서류가 있으면 `document`에 base64로 들어 있습니다.
#[derive(Debug, Deserialize)]
pub struct LegacyRecord<P> {
    #[serde(flatten)]
    pub fields: P,
    pub document: Option<String>,
    pub document_name: Option<String>,
}

/// 이관되는 휴가는 이미 처리된 상태(approved 등)를 그대로 가져옵니다.
#[derive(Debug, Deserialize)]
pub struct LegacyLeave {
    #[serde(flatten)]
    pub fields: LeavePayload,
    pub status: Option<LeaveStatus>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyAttachment {
    pub file_name: String,
    /// base64 또는 data URL
    pub data: String,
    pub mime_type: Option<String>,
    pub category: Option<String>,
}

/// 실패한 직원 기록 하나
#[derive(Debug, Serialize)]
pub struct ImportFailure {
    /// 요청 배열에서의 위치
    pub index: usize,
    pub employee_code: Option<String>,
    pub error: String,
}

/// 이관 결과
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    /// 이미 같은 사번이 있어 건너뛴 직원들
    pub skipped: Vec<String>,
    pub failed: Vec<ImportFailure>,
}
