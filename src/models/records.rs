//! # 직원 하위 기록 모델
//!
//! 학력, 부양가족, 교육, 건강기록, 급여 이력, 계좌, 휴가, 자산은 모두
//! "직원 한 명에 딸린 단일 테이블 기록"이라는 같은 모양을 갖습니다.
//! `Resource` 트레이트가 그 공통점(테이블 이름, 컬럼, 입력 검증, 바인딩할 값)을 기술하고,
//! `db::records`와 `routes::records`가 이를 이용해 CRUD를 한 번만 구현합니다.
//!
//! | 기록 | 테이블 | 경로 |
//! |------|--------|------|
//! | `Qualification` | qualifications | /api/qualifications |
//! | `Dependent` | dependents | /api/dependents |
//! | `Training` | trainings | /api/trainings |
//! | `MedicalRecord` | medical_records | /api/medical-records |
//! | `SalaryHistory` | salary_history | /api/salary-history |
//! | `BankDetail` | bank_details | /api/bank-details |
//! | `Leave` | leaves | /api/leaves |
//! | `Asset` | assets | /api/assets |

use crate::{
    db::query::{SqlParam, Statement},
    error::AppError,
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow};

/// 직원에 딸린 단일 테이블 기록
pub trait Resource:
    for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Sync + Unpin + 'static
{
    /// 테이블 이름
    const TABLE: &'static str;
    /// `/api/` 뒤에 붙는 경로
    const PATH: &'static str;
    /// SELECT 할 컬럼 목록 (구조체 필드와 이름이 같아야 함)
    const COLUMNS: &'static str;
    /// 목록 정렬 기준
    const ORDER_BY: &'static str = "id";
    /// 업로드한 증빙서류 경로를 저장하는 컬럼. 없으면 문서 업로드 경로를 만들지 않습니다.
    const DOCUMENT_COLUMN: Option<&'static str> = None;

    /// 생성/수정 요청 본문
    type Payload: DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> i64;
    fn employee_id(&self) -> i64;

    fn document_path(&self) -> Option<&str> {
        None
    }

    /// 생성 요청 검증 (필수 필드, 날짜 형식 등)
    fn validate_create(payload: &Self::Payload) -> Result<(), AppError>;

    /// 수정 요청 검증. 기존 값과 합쳐야 판단할 수 있는 규칙(날짜 순서 등)을 확인합니다.
    fn validate_update(_payload: &Self::Payload, _current: &Self) -> Result<(), AppError> {
        Ok(())
    }

    /// 요청에 포함된 (컬럼, 값) 목록. 수정 시에는 `current`로 파생 컬럼을 다시 계산합니다.
    fn assignments(payload: &Self::Payload, current: Option<&Self>) -> Vec<(&'static str, SqlParam)>;

    /// INSERT/UPDATE 앞에 같은 트랜잭션으로 실행할 문장
    fn companion_statements(
        _payload: &Self::Payload,
        _employee_id: i64,
        _record_id: Option<i64>,
    ) -> Vec<Statement> {
        Vec::new()
    }
}

/// 지울 수 있는 선택 필드.
/// 필드 누락은 `None`(변경 안 함), `null`은 `Some(None)`(값 지우기), 값은 `Some(Some(v))`
pub type Nullable<T> = Option<Option<T>>;

/// `Nullable` 필드의 역직렬화. `#[serde(default, deserialize_with = "nullable")]`로 사용합니다.
///
/// serde는 `Option<Option<T>>`의 `null`을 바깥 `None`으로 읽기 때문에
/// 값이 있으면(`null` 포함) 항상 `Some`으로 감쌉니다.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 요청에 실제 값이 들어 있으면 그 문자열
pub fn present_text(value: &Nullable<String>) -> Option<&str> {
    value.as_ref().and_then(|v| v.as_deref())
}

/// 수정 후의 값: 요청에 필드가 있으면 그 값(null 포함), 없으면 기존 값
fn merged<'a>(value: &'a Nullable<String>, current: &'a Option<String>) -> Option<&'a str> {
    match value {
        Some(v) => v.as_deref(),
        None => current.as_deref(),
    }
}

// ── 검증 헬퍼 ──

fn require_text(field: &str, value: &Option<String>) -> Result<(), AppError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(AppError::BadRequest(format!("{} is required", field))),
    }
}

/// `YYYY-MM-DD` 형식의 날짜를 파싱합니다.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("{} must be a date in YYYY-MM-DD format", field)))
}

fn check_date(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) => parse_date(field, v).map(|_| ()),
        None => Ok(()),
    }
}

fn check_range(start: Option<&str>, end: Option<&str>) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start, end) {
        if parse_date("start_date", start)? > parse_date("end_date", end)? {
            return Err(AppError::BadRequest(
                "start_date must not be after end_date".to_string(),
            ));
        }
    }
    Ok(())
}

fn set<T>(out: &mut Vec<(&'static str, SqlParam)>, column: &'static str, value: &Option<T>)
where
    T: Into<SqlParam> + Clone,
{
    if let Some(v) = value {
        out.push((column, v.clone().into()));
    }
}

// ============================================================================
// 학력 (Qualification)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Qualification {
    pub id: i64,
    pub employee_id: i64,
    pub degree: String,
    pub institution: String,
    pub field_of_study: Option<String>,
    pub year_of_completion: Option<i64>,
    pub grade: Option<String>,
    /// 졸업증명서 등 증빙서류의 공개 경로 (`/uploads/...`)
    pub document_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QualificationPayload {
    pub degree: Option<String>,
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub field_of_study: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub year_of_completion: Nullable<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub grade: Nullable<String>,
}

impl Resource for Qualification {
    const TABLE: &'static str = "qualifications";
    const PATH: &'static str = "qualifications";
    const COLUMNS: &'static str = "id, employee_id, degree, institution, field_of_study, \
        year_of_completion, grade, document_path, created_at, updated_at";
    const ORDER_BY: &'static str = "year_of_completion DESC, id";
    const DOCUMENT_COLUMN: Option<&'static str> = Some("document_path");
    type Payload = QualificationPayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn employee_id(&self) -> i64 {
        self.employee_id
    }

    fn document_path(&self) -> Option<&str> {
        self.document_path.as_deref()
    }

    fn validate_create(p: &Self::Payload) -> Result<(), AppError> {
        require_text("degree", &p.degree)?;
        require_text("institution", &p.institution)?;
        validate_year(p.year_of_completion.flatten())
    }

    fn validate_update(p: &Self::Payload, _current: &Self) -> Result<(), AppError> {
        validate_year(p.year_of_completion.flatten())
    }

    fn assignments(p: &Self::Payload, _current: Option<&Self>) -> Vec<(&'static str, SqlParam)> {
        let mut out = Vec::new();
        set(&mut out, "degree", &p.degree);
        set(&mut out, "institution", &p.institution);
        set(&mut out, "field_of_study", &p.field_of_study);
        set(&mut out, "year_of_completion", &p.year_of_completion);
        set(&mut out, "grade", &p.grade);
        out
    }
}

fn validate_year(year: Option<i64>) -> Result<(), AppError> {
    match year {
        Some(y) if !(1900..=2100).contains(&y) => Err(AppError::BadRequest(
            "year_of_completion is out of range".to_string(),
        )),
        _ => Ok(()),
    }
}

// ============================================================================
// 부양가족 (Dependent)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dependent {
    pub id: i64,
    pub employee_id: i64,
    pub name: String,
    /// 관계 (spouse, child, parent ...)
    pub relationship: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependentPayload {
    pub name: Option<String>,
    pub relationship: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_of_birth: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub contact_number: Nullable<String>,
}

impl Resource for Dependent {
    const TABLE: &'static str = "dependents";
    const PATH: &'static str = "dependents";
    const COLUMNS: &'static str = "id, employee_id, name, relationship, date_of_birth, gender, \
        contact_number, created_at, updated_at";
    type Payload = DependentPayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn employee_id(&self) -> i64 {
        self.employee_id
    }

    fn validate_create(p: &Self::Payload) -> Result<(), AppError> {
        require_text("name", &p.name)?;
        require_text("relationship", &p.relationship)?;
        check_date("date_of_birth", present_text(&p.date_of_birth))
    }

    fn validate_update(p: &Self::Payload, _current: &Self) -> Result<(), AppError> {
        check_date("date_of_birth", present_text(&p.date_of_birth))
    }

    fn assignments(p: &Self::Payload, _current: Option<&Self>) -> Vec<(&'static str, SqlParam)> {
        let mut out = Vec::new();
        set(&mut out, "name", &p.name);
        set(&mut out, "relationship", &p.relationship);
        set(&mut out, "date_of_birth", &p.date_of_birth);
        set(&mut out, "gender", &p.gender);
        set(&mut out, "contact_number", &p.contact_number);
        out
    }
}

// ============================================================================
// 교육 (Training)
// ============================================================================

const TRAINING_STATUSES: [&str; 4] = ["planned", "in_progress", "completed", "cancelled"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Training {
    pub id: i64,
    pub employee_id: i64,
    pub title: String,
    pub provider: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: String,
    /// 수료증 공개 경로
    pub certificate_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingPayload {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub provider: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Nullable<String>,
    pub status: Option<String>,
}

impl TrainingPayload {
    fn check(&self) -> Result<(), AppError> {
        check_date("start_date", present_text(&self.start_date))?;
        check_date("end_date", present_text(&self.end_date))?;
        if let Some(status) = &self.status {
            if !TRAINING_STATUSES.contains(&status.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "status must be one of {}",
                    TRAINING_STATUSES.join(", ")
                )));
            }
        }
        Ok(())
    }
}

impl Resource for Training {
    const TABLE: &'static str = "trainings";
    const PATH: &'static str = "trainings";
    const COLUMNS: &'static str = "id, employee_id, title, provider, start_date, end_date, status, \
        certificate_path, created_at, updated_at";
    const ORDER_BY: &'static str = "start_date DESC, id";
    const DOCUMENT_COLUMN: Option<&'static str> = Some("certificate_path");
    type Payload = TrainingPayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn employee_id(&self) -> i64 {
        self.employee_id
    }

    fn document_path(&self) -> Option<&str> {
        self.certificate_path.as_deref()
    }

    fn validate_create(p: &Self::Payload) -> Result<(), AppError> {
        require_text("title", &p.title)?;
        p.check()?;
        check_range(present_text(&p.start_date), present_text(&p.end_date))
    }

    fn validate_update(p: &Self::Payload, current: &Self) -> Result<(), AppError> {
        p.check()?;
        check_range(
            merged(&p.start_date, &current.start_date),
            merged(&p.end_date, &current.end_date),
        )
    }

    fn assignments(p: &Self::Payload, _current: Option<&Self>) -> Vec<(&'static str, SqlParam)> {
        let mut out = Vec::new();
        set(&mut out, "title", &p.title);
        set(&mut out, "provider", &p.provider);
        set(&mut out, "start_date", &p.start_date);
        set(&mut out, "end_date", &p.end_date);
        set(&mut out, "status", &p.status);
        out
    }
}

// ============================================================================
// 건강기록 (MedicalRecord)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MedicalRecord {
    pub id: i64,
    pub employee_id: i64,
    pub record_date: String,
    pub blood_group: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub document_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicalRecordPayload {
    pub record_date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub blood_group: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub condition: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Nullable<String>,
}

impl Resource for MedicalRecord {
    const TABLE: &'static str = "medical_records";
    const PATH: &'static str = "medical-records";
    const COLUMNS: &'static str = "id, employee_id, record_date, blood_group, condition, notes, \
        document_path, created_at, updated_at";
    const ORDER_BY: &'static str = "record_date DESC, id";
    const DOCUMENT_COLUMN: Option<&'static str> = Some("document_path");
    type Payload = MedicalRecordPayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn employee_id(&self) -> i64 {
        self.employee_id
    }

    fn document_path(&self) -> Option<&str> {
        self.document_path.as_deref()
    }

    fn validate_create(p: &Self::Payload) -> Result<(), AppError> {
        require_text("record_date", &p.record_date)?;
        check_date("record_date", p.record_date.as_deref())
    }

    fn validate_update(p: &Self::Payload, _current: &Self) -> Result<(), AppError> {
        check_date("record_date", p.record_date.as_deref())
    }

    fn assignments(p: &Self::Payload, _current: Option<&Self>) -> Vec<(&'static str, SqlParam)> {
        let mut out = Vec::new();
        set(&mut out, "record_date", &p.record_date);
        set(&mut out, "blood_group", &p.blood_group);
        set(&mut out, "condition", &p.condition);
        set(&mut out, "notes", &p.notes);
        out
    }
}

// ============================================================================
// 급여 이력 (SalaryHistory)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalaryHistory {
    pub id: i64,
    pub employee_id: i64,
    /// 적용 시작일
    pub effective_date: String,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    /// 변경 사유 (입사, 승진, 연봉 조정 ...)
    pub reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalaryHistoryPayload {
    pub effective_date: Option<String>,
    pub basic_salary: Option<f64>,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub reason: Nullable<String>,
}

impl SalaryHistoryPayload {
    fn check(&self) -> Result<(), AppError> {
        check_date("effective_date", self.effective_date.as_deref())?;
        for (field, amount) in [
            ("basic_salary", self.basic_salary),
            ("allowances", self.allowances),
            ("deductions", self.deductions),
        ] {
            if let Some(v) = amount {
                if !v.is_finite() || v < 0.0 {
                    return Err(AppError::BadRequest(format!(
                        "{} must be a non-negative number",
                        field
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Resource for SalaryHistory {
    const TABLE: &'static str = "salary_history";
    const PATH: &'static str = "salary-history";
    const COLUMNS: &'static str = "id, employee_id, effective_date, basic_salary, allowances, \
        deductions, reason, created_at, updated_at";
    const ORDER_BY: &'static str = "effective_date DESC, id DESC";
    type Payload = SalaryHistoryPayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn employee_id(&self) -> i64 {
        self.employee_id
    }

    fn validate_create(p: &Self::Payload) -> Result<(), AppError> {
        require_text("effective_date", &p.effective_date)?;
        if p.basic_salary.is_none() {
            return Err(AppError::BadRequest("basic_salary is required".to_string()));
        }
        p.check()
    }

    fn validate_update(p: &Self::Payload, _current: &Self) -> Result<(), AppError> {
        p.check()
    }

    fn assignments(p: &Self::Payload, _current: Option<&Self>) -> Vec<(&'static str, SqlParam)> {
        let mut out = Vec::new();
        set(&mut out, "effective_date", &p.effective_date);
        set(&mut out, "basic_salary", &p.basic_salary);
        set(&mut out, "allowances", &p.allowances);
        set(&mut out, "deductions", &p.deductions);
        set(&mut out, "reason", &p.reason);
        out
    }
}

// ============================================================================
// 계좌 정보 (BankDetail)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BankDetail {
    pub id: i64,
    pub employee_id: i64,
    pub bank_name: String,
    pub account_holder: String,
    pub account_number: String,
    pub branch: Option<String>,
    pub routing_code: Option<String>,
    /// 급여 이체용 주 계좌. 직원당 최대 하나
    pub is_primary: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BankDetailPayload {
    pub bank_name: Option<String>,
    pub account_holder: Option<String>,
    pub account_number: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub branch: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub routing_code: Nullable<String>,
    pub is_primary: Option<bool>,
}

impl Resource for BankDetail {
    const TABLE: &'static str = "bank_details";
    const PATH: &'static str = "bank-details";
    const COLUMNS: &'static str = "id, employee_id, bank_name, account_holder, account_number, \
        branch, routing_code, is_primary, created_at, updated_at";
    const ORDER_BY: &'static str = "is_primary DESC, id";
    type Payload = BankDetailPayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn employee_id(&self) -> i64 {
        self.employee_id
    }

    fn validate_create(p: &Self::Payload) -> Result<(), AppError> {
        require_text("bank_name", &p.bank_name)?;
        require_text("account_holder", &p.account_holder)?;
        require_text("account_number", &p.account_number)
    }

    fn assignments(p: &Self::Payload, _current: Option<&Self>) -> Vec<(&'static str, SqlParam)> {
        let mut out = Vec::new();
        set(&mut out, "bank_name", &p.bank_name);
        set(&mut out, "account_holder", &p.account_holder);
        set(&mut out, "account_number", &p.account_number);
        set(&mut out, "branch", &p.branch);
        set(&mut out, "routing_code", &p.routing_code);
        set(&mut out, "is_primary", &p.is_primary);
        out
    }

    /// 주 계좌로 지정하면 같은 직원의 다른 계좌에서 주 계좌 표시를 해제합니다.
    fn companion_statements(
        p: &Self::Payload,
        employee_id: i64,
        record_id: Option<i64>,
    ) -> Vec<Statement> {
        if p.is_primary != Some(true) {
            return Vec::new();
        }
        vec![Statement::new(
            "UPDATE bank_details SET is_primary = 0 WHERE employee_id = ? AND id <> ?",
        )
        .bind(employee_id)
        // 새 기록은 아직 ID가 없으므로 존재할 수 없는 0을 사용
        .bind(record_id.unwrap_or(0))]
    }
}

// ============================================================================
// 휴가 (Leave)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Leave {
    pub id: i64,
    pub employee_id: i64,
    /// 휴가 종류 (annual, sick, unpaid ...)
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    /// 시작일과 종료일을 포함한 일수
    pub days: i64,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeavePayload {
    pub leave_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub reason: Nullable<String>,
}

/// 시작일과 종료일을 포함한 휴가 일수
pub fn leave_days(start: &str, end: &str) -> Result<i64, AppError> {
    let start = parse_date("start_date", start)?;
    let end = parse_date("end_date", end)?;
    if start > end {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }
    Ok((end - start).num_days() + 1)
}

impl Resource for Leave {
    const TABLE: &'static str = "leaves";
    const PATH: &'static str = "leaves";
    const COLUMNS: &'static str = "id, employee_id, leave_type, start_date, end_date, days, reason, \
        status, reviewed_by, reviewed_at, created_at, updated_at";
    const ORDER_BY: &'static str = "start_date DESC, id DESC";
    type Payload = LeavePayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn employee_id(&self) -> i64 {
        self.employee_id
    }

    fn validate_create(p: &Self::Payload) -> Result<(), AppError> {
        require_text("leave_type", &p.leave_type)?;
        require_text("start_date", &p.start_date)?;
        require_text("end_date", &p.end_date)?;
        leave_days(
            p.start_date.as_deref().unwrap_or_default(),
            p.end_date.as_deref().unwrap_or_default(),
        )
        .map(|_| ())
    }

    fn validate_update(p: &Self::Payload, current: &Self) -> Result<(), AppError> {
        if current.status != LeaveStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Leave is already {}",
                current.status.as_str()
            )));
        }
        leave_days(
            p.start_date.as_deref().unwrap_or(&current.start_date),
            p.end_date.as_deref().unwrap_or(&current.end_date),
        )
        .map(|_| ())
    }

    fn assignments(p: &Self::Payload, current: Option<&Self>) -> Vec<(&'static str, SqlParam)> {
        let mut out = Vec::new();
        set(&mut out, "leave_type", &p.leave_type);
        set(&mut out, "start_date", &p.start_date);
        set(&mut out, "end_date", &p.end_date);
        set(&mut out, "reason", &p.reason);

        // 날짜가 바뀌었거나 새로 만드는 경우 일수를 다시 계산
        if p.start_date.is_some() || p.end_date.is_some() {
            let start = p.start_date.as_deref().or(current.map(|c| c.start_date.as_str()));
            let end = p.end_date.as_deref().or(current.map(|c| c.end_date.as_str()));
            if let (Some(start), Some(end)) = (start, end) {
                if let Ok(days) = leave_days(start, end) {
                    out.push(("days", SqlParam::Int(days)));
                }
            }
        }
        out
    }
}

// ============================================================================
// 자산 (Asset)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: i64,
    pub employee_id: i64,
    /// 자산 종류 (laptop, phone, access_card ...)
    pub asset_type: String,
    pub asset_tag: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub assigned_date: Option<String>,
    /// 반납일. None이면 아직 사용 중
    pub return_date: Option<String>,
    pub condition: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetPayload {
    pub asset_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub asset_tag: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub serial_number: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_date: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub return_date: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub condition: Nullable<String>,
}

impl Resource for Asset {
    const TABLE: &'static str = "assets";
    const PATH: &'static str = "assets";
    const COLUMNS: &'static str = "id, employee_id, asset_type, asset_tag, serial_number, \
        description, assigned_date, return_date, condition, created_at, updated_at";
    const ORDER_BY: &'static str = "assigned_date DESC, id";
    type Payload = AssetPayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn employee_id(&self) -> i64 {
        self.employee_id
    }

    fn validate_create(p: &Self::Payload) -> Result<(), AppError> {
        require_text("asset_type", &p.asset_type)?;
        check_date("assigned_date", present_text(&p.assigned_date))?;
        check_date("return_date", present_text(&p.return_date))?;
        check_range(present_text(&p.assigned_date), present_text(&p.return_date))
    }

    fn validate_update(p: &Self::Payload, current: &Self) -> Result<(), AppError> {
        check_date("assigned_date", present_text(&p.assigned_date))?;
        check_date("return_date", present_text(&p.return_date))?;
        check_range(
            merged(&p.assigned_date, &current.assigned_date),
            merged(&p.return_date, &current.return_date),
        )
    }

    fn assignments(p: &Self::Payload, _current: Option<&Self>) -> Vec<(&'static str, SqlParam)> {
        let mut out = Vec::new();
        set(&mut out, "asset_type", &p.asset_type);
        set(&mut out, "asset_tag", &p.asset_tag);
        set(&mut out, "serial_number", &p.serial_number);
        set(&mut out, "description", &p.description);
        set(&mut out, "assigned_date", &p.assigned_date);
        set(&mut out, "return_date", &p.return_date);
        set(&mut out, "condition", &p.condition);
        out
    }
}

/// `POST /api/{resource}` 요청 본문: 대상 직원 ID + 기록 필드
#[derive(Debug, Deserialize)]
pub struct CreateRecord<P> {
    pub employee_id: i64,
    #[serde(flatten)]
    pub fields: P,
}

/// `GET /api/{resource}` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct RecordQuery {
    pub employee_id: Option<i64>,
}
