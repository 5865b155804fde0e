//! localStorage 데이터 이관 통합 테스트

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use hrdesk::models::Role;
use serde_json::json;
use tower::ServiceExt;

fn files_in(app: &TestApp, subdir: &str) -> usize {
    std::fs::read_dir(std::path::Path::new(app.uploads_path()).join(subdir))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn import_writes_rows_and_documents() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;

    let (status, report) = app
        .post(
            "/api/migration/import",
            &hr,
            json!({
                "employees": [{
                    "employee_code": "E-100",
                    "first_name": "Minji",
                    "last_name": "Kim",
                    "qualifications": [{
                        "degree": "BSc",
                        "institution": "KAIST",
                        "document": "data:application/pdf;base64,JVBERi0xLjQ=",
                        "document_name": "diploma.pdf"
                    }],
                    "leaves": [{
                        "leave_type": "annual",
                        "start_date": "2025-12-22",
                        "end_date": "2025-12-24",
                        "status": "approved"
                    }],
                    "attachments": [{
                        "file_name": "contract.pdf",
                        "data": "JVBERi0xLjQ=",
                        "category": "contract"
                    }]
                }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["imported"], 1);
    assert!(report["failed"].as_array().unwrap().is_empty());

    let document: String = sqlx::query_scalar("SELECT document_path FROM qualifications")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(document.starts_with("/uploads/migrated/"));
    let on_disk = std::path::Path::new(app.uploads_path())
        .join(document.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(on_disk).unwrap(), b"%PDF-1.4");

    let status: String = sqlx::query_scalar("SELECT status FROM leaves")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(status, "approved");

    assert_eq!(app.count("employee_attachments").await, 1);
    assert_eq!(files_in(&app, "migrated"), 2);

    let (status, body) = app.get("/api/migration/status", &hr).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["employees"], 1);
    assert_eq!(body["counts"]["qualifications"], 1);
}

#[tokio::test]
async fn existing_codes_are_skipped() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    let request = json!({
        "employees": [{ "employee_code": "E-100", "first_name": "Minji", "last_name": "Kim" }]
    });

    let (_, first) = app.post("/api/migration/import", &hr, request.clone()).await;
    assert_eq!(first["imported"], 1);

    let (status, second) = app.post("/api/migration/import", &hr, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["imported"], 0);
    assert_eq!(second["skipped"], json!(["E-100"]));
    assert_eq!(app.count("employees").await, 1);
}

#[tokio::test]
async fn failed_employee_leaves_no_rows_or_files() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;

    let (status, report) = app
        .post(
            "/api/migration/import",
            &hr,
            json!({
                "employees": [
                    {
                        "employee_code": "E-200",
                        "first_name": "Jisoo",
                        "last_name": "Park",
                        "qualifications": [{
                            "degree": "MSc",
                            "institution": "SNU",
                            "document": "JVBERi0xLjQ=",
                            "document_name": "thesis.pdf"
                        }],
                        // 필수 필드(relationship)가 빠진 부양가족
                        "dependents": [{ "name": "Seo" }]
                    },
                    { "employee_code": "E-201", "first_name": "Hana", "last_name": "Lee" }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["imported"], 1);
    let failed = report["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["index"], 0);
    assert_eq!(failed[0]["employee_code"], "E-200");

    assert_eq!(app.count("employees").await, 1);
    assert_eq!(app.count("qualifications").await, 0);
    assert_eq!(files_in(&app, "migrated"), 0);
}

#[tokio::test]
async fn import_requires_staff() {
    let app = TestApp::new().await;
    let (_, employee) = app.user("minji", Role::Employee).await;

    let (status, _) = app
        .post("/api/migration/import", &employee, json!({ "employees": [] }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unnamed_document_keeps_its_type_when_served() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;

    let (status, report) = app
        .post(
            "/api/migration/import",
            &hr,
            json!({
                "employees": [{
                    "employee_code": "E-500",
                    "first_name": "Yuna",
                    "last_name": "Jang",
                    "medical_records": [{
                        "record_date": "2025-02-11",
                        "document": "data:image/jpeg;base64,/9j/4AAQSkZJRg=="
                    }]
                }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["imported"], 1, "{report}");

    let document: String = sqlx::query_scalar("SELECT document_path FROM medical_records")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(document.ends_with(".jpg"), "{document}");

    let response = app
        .app
        .clone()
        .oneshot(Request::builder().uri(&document).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
}
