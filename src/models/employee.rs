//! # 직원(Employee) 모델
//!
//! 인사 기록의 중심이 되는 직원 엔티티와 요청/응답 구조체입니다.
//! 직원은 사용자 계정(User)과 1:1로 연결될 수 있고,
//! 나머지 모든 기록(학력, 부양가족, 휴가 등)은 직원을 참조합니다.

use super::{
    attachment::EmployeeAttachment,
    records::{
        nullable, parse_date, present_text, Asset, BankDetail, Dependent, Leave, MedicalRecord,
        Nullable, Qualification, SalaryHistory, Training,
    },
    user::Role,
};
use crate::{db::query::SqlParam, error::AppError};
use serde::{Deserialize, Serialize};

/// 직원 엔티티: DB의 `employees` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    /// 연결된 로그인 계정. 계정 없이 등록된 직원은 None
    pub user_id: Option<i64>,
    /// 사번 (고유)
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub date_of_joining: Option<String>,
    /// 재직 상태 (active, on_leave, terminated ...)
    pub employment_status: String,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 직원 생성/수정 요청의 필드들.
///
/// 생성 시에는 `employee_code`, `first_name`, `last_name`이 필수이고,
/// 수정(PUT) 시에는 포함된 필드만 변경하고, 선택 필드에 `null`을 보내면 값을 지웁니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePayload {
    pub employee_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_of_birth: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub department: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub designation: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_of_joining: Nullable<String>,
    pub employment_status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Nullable<String>,
}

/// 직원과 함께 만들 로그인 계정
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// `POST /api/employees` 요청 본문
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    #[serde(flatten)]
    pub employee: EmployeePayload,
    pub account: Option<NewAccount>,
}

/// `GET /api/employees` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    pub department: Option<String>,
    pub status: Option<String>,
    /// 이름, 사번, 이메일 부분 검색어
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// 직원 한 명의 전체 인사 기록 (`GET /api/employees/{id}/profile`)
#[derive(Debug, Serialize)]
pub struct EmployeeProfile {
    pub employee: Employee,
    pub qualifications: Vec<Qualification>,
    pub dependents: Vec<Dependent>,
    pub trainings: Vec<Training>,
    pub medical_records: Vec<MedicalRecord>,
    pub salary_history: Vec<SalaryHistory>,
    pub bank_details: Vec<BankDetail>,
    pub leaves: Vec<Leave>,
    pub assets: Vec<Asset>,
    pub attachments: Vec<EmployeeAttachment>,
}

impl EmployeePayload {
    /// 생성 요청 검증: 사번과 이름은 필수입니다.
    pub fn validate_create(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("employee_code", &self.employee_code),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                return Err(AppError::BadRequest(format!("{} is required", field)));
            }
        }
        self.validate()
    }

    /// 형식 검증 (생성/수정 공통)
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(email) = present_text(&self.email) {
            if !email.contains('@') {
                return Err(AppError::BadRequest("Invalid email address".to_string()));
            }
        }
        for (field, value) in [
            ("date_of_birth", present_text(&self.date_of_birth)),
            ("date_of_joining", present_text(&self.date_of_joining)),
        ] {
            if let Some(v) = value {
                parse_date(field, v)?;
            }
        }
        if let Some(status) = &self.employment_status {
            if status.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "employment_status must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// 요청에 포함된 (컬럼, 값) 목록. `null`로 보낸 선택 필드는 `SqlParam::Null`입니다.
    pub fn assignments(&self) -> Vec<(&'static str, SqlParam)> {
        let required = [
            ("employee_code", &self.employee_code),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("employment_status", &self.employment_status),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.clone().map(|v| (column, SqlParam::Text(v))));

        let optional = [
            ("email", &self.email),
            ("phone", &self.phone),
            ("date_of_birth", &self.date_of_birth),
            ("gender", &self.gender),
            ("department", &self.department),
            ("designation", &self.designation),
            ("date_of_joining", &self.date_of_joining),
            ("address", &self.address),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.clone().map(|v| (column, SqlParam::from(v))));

        required.chain(optional).collect()
    }
}
