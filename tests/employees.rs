//! 직원, 하위 기록, 첨부파일, 휴가 심사 통합 테스트

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::TestApp;
use hrdesk::{db::employees::CHILD_TABLES, models::Role};
use serde_json::{json, Value};

async fn create_employee(app: &TestApp, token: &str, body: Value) -> Value {
    let (status, employee) = app.post("/api/employees", token, body).await;
    assert_eq!(status, StatusCode::CREATED, "{employee}");
    employee
}

#[tokio::test]
async fn create_employee_with_account_links_user() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;

    let employee = create_employee(
        &app,
        &hr,
        json!({
            "employee_code": "E-001",
            "first_name": "Minji",
            "last_name": "Kim",
            "department": "Finance",
            "account": { "username": "minji", "email": "minji@example.com", "password": "password123" }
        }),
    )
    .await;
    assert_eq!(employee["employment_status"], "active");
    let user_id = employee["user_id"].as_i64().unwrap();

    let role: String = sqlx::query_scalar("SELECT role FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(role, "employee");
}

#[tokio::test]
async fn duplicate_employee_code_leaves_no_account_behind() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    create_employee(
        &app,
        &hr,
        json!({ "employee_code": "E-001", "first_name": "Minji", "last_name": "Kim" }),
    )
    .await;

    let (status, _) = app
        .post(
            "/api/employees",
            &hr,
            json!({
                "employee_code": "E-001",
                "first_name": "Jisoo",
                "last_name": "Park",
                "account": { "username": "jisoo", "email": "jisoo@example.com", "password": "password123" }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.count("employees").await, 1);
    // hr 계정만 남아 있어야 합니다.
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn hr_cannot_create_admin_accounts() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;

    let (status, _) = app
        .post(
            "/api/employees",
            &hr,
            json!({
                "employee_code": "E-001",
                "first_name": "Minji",
                "last_name": "Kim",
                "account": { "username": "minji", "email": "minji@example.com", "password": "password123", "role": "admin" }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.count("employees").await, 0);
}

#[tokio::test]
async fn list_filters_by_department() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    for (code, first, dept) in [("E-1", "Minji", "Finance"), ("E-2", "Jisoo", "Sales")] {
        create_employee(
            &app,
            &hr,
            json!({ "employee_code": code, "first_name": first, "last_name": "Kim", "department": dept }),
        )
        .await;
    }

    let (status, body) = app.get("/api/employees?department=Sales", &hr).await;
    assert_eq!(status, StatusCode::OK);
    let employees = body["employees"].as_array().unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0]["employee_code"], "E-2");
}

#[tokio::test]
async fn record_for_missing_employee_is_not_found() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;

    let (status, _) = app
        .post(
            "/api/dependents",
            &hr,
            json!({ "employee_id": 999, "name": "Seo", "relationship": "child" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_one_primary_bank_detail() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    let employee = create_employee(
        &app,
        &hr,
        json!({ "employee_code": "E-001", "first_name": "Minji", "last_name": "Kim" }),
    )
    .await;
    let employee_id = employee["id"].as_i64().unwrap();

    for bank in ["First Bank", "Second Bank"] {
        let (status, _) = app
            .post(
                "/api/bank-details",
                &hr,
                json!({
                    "employee_id": employee_id,
                    "bank_name": bank,
                    "account_holder": "Minji Kim",
                    "account_number": "000-111",
                    "is_primary": true
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app
        .get(&format!("/api/bank-details?employee_id={}", employee_id), &hr)
        .await;
    let primaries: Vec<&Value> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["is_primary"] == true)
        .collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0]["bank_name"], "Second Bank");
}

#[tokio::test]
async fn leave_can_be_reviewed_once() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    create_employee(
        &app,
        &hr,
        json!({
            "employee_code": "E-001",
            "first_name": "Minji",
            "last_name": "Kim",
            "account": { "username": "minji", "email": "minji@example.com", "password": "password123" }
        }),
    )
    .await;

    let (_, login) = app
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "minji", "password": "password123" })),
        )
        .await;
    let own = login["access_token"].as_str().unwrap().to_string();

    let (status, leave) = app
        .post(
            "/api/me/leaves",
            &own,
            json!({ "leave_type": "annual", "start_date": "2026-03-02", "end_date": "2026-03-04" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(leave["status"], "pending");
    assert_eq!(leave["days"], 3);

    // 본인은 심사할 수 없습니다.
    let approve = format!("/api/leaves/{}/approve", leave["id"]);
    let (status, _) = app.post(&approve, &own, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, approved) = app.post(&approve, &hr, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    assert!(approved["reviewed_by"].as_i64().is_some());

    let reject = format!("/api/leaves/{}/reject", leave["id"]);
    let (status, _) = app.post(&reject, &hr, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, mine) = app.get("/api/me/leaves", &own).await;
    assert_eq!(mine["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn leave_with_reversed_dates_is_rejected() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    let employee = create_employee(
        &app,
        &hr,
        json!({ "employee_code": "E-001", "first_name": "Minji", "last_name": "Kim" }),
    )
    .await;

    let (status, _) = app
        .post(
            "/api/leaves",
            &hr,
            json!({
                "employee_id": employee["id"],
                "leave_type": "sick",
                "start_date": "2026-03-04",
                "end_date": "2026-03-02"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("leaves").await, 0);
}

#[tokio::test]
async fn attachment_upload_is_served_and_deleted() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    let employee = create_employee(
        &app,
        &hr,
        json!({ "employee_code": "E-001", "first_name": "Minji", "last_name": "Kim" }),
    )
    .await;
    let uri = format!("/api/employees/{}/attachments", employee["id"]);

    let (status, attachment) = app
        .upload(&uri, &hr, "contract.pdf", b"%PDF-1.4 contract", Some("contract"))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{attachment}");
    assert_eq!(attachment["file_name"], "contract.pdf");
    assert_eq!(attachment["category"], "contract");
    assert_eq!(attachment["mime_type"], "application/pdf");
    assert_eq!(attachment["file_size"], 17);

    let public_path = attachment["file_path"].as_str().unwrap().to_string();
    assert!(public_path.starts_with("/uploads/attachments/"));

    let request = Request::builder()
        .uri(&public_path)
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "%PDF-1.4 contract");

    let on_disk = std::path::Path::new(app.uploads_path())
        .join(public_path.trim_start_matches("/uploads/"));
    assert!(on_disk.exists());

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/attachments/{}", attachment["id"]),
            Some(&hr),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!on_disk.exists());
}

#[tokio::test]
async fn deleting_employee_cascades_and_deactivates_account() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    let employee = create_employee(
        &app,
        &hr,
        json!({
            "employee_code": "E-001",
            "first_name": "Minji",
            "last_name": "Kim",
            "account": { "username": "minji", "email": "minji@example.com", "password": "password123" }
        }),
    )
    .await;
    let employee_id = employee["id"].as_i64().unwrap();
    let user_id = employee["user_id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            "/api/qualifications",
            &hr,
            json!({ "employee_id": employee_id, "degree": "BSc", "institution": "KAIST" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, attachment) = app
        .upload(
            &format!("/api/employees/{}/attachments", employee_id),
            &hr,
            "id.png",
            b"png-bytes",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let on_disk = std::path::Path::new(app.uploads_path()).join(
        attachment["file_path"]
            .as_str()
            .unwrap()
            .trim_start_matches("/uploads/"),
    );
    assert!(on_disk.exists());

    let (status, profile) = app
        .get(&format!("/api/employees/{}/profile", employee_id), &hr)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["qualifications"].as_array().unwrap().len(), 1);
    assert_eq!(profile["attachments"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/employees/{}", employee_id),
            Some(&hr),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(app.count("employees").await, 0);
    assert_eq!(app.count("qualifications").await, 0);
    assert_eq!(app.count("employee_attachments").await, 0);
    assert!(!on_disk.exists());

    let active: bool = sqlx::query_scalar("SELECT is_active FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(!active);

    let (status, _) = app
        .get(&format!("/api/employees/{}", employee_id), &hr)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_employee_clears_every_child_table() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    let (status, report) = app
        .post(
            "/api/migration/import",
            &hr,
            json!({
                "employees": [{
                    "employee_code": "E-300",
                    "first_name": "Seojun",
                    "last_name": "Choi",
                    "qualifications": [{ "degree": "BSc", "institution": "KAIST" }],
                    "dependents": [{ "name": "Yuna", "relationship": "child" }],
                    "trainings": [{ "title": "Safety induction" }],
                    "medical_records": [{ "record_date": "2025-04-01", "blood_group": "A+" }],
                    "salary_history": [{ "effective_date": "2025-01-01", "basic_salary": 4200.0 }],
                    "bank_details": [{
                        "bank_name": "First Bank",
                        "account_holder": "Seojun Choi",
                        "account_number": "000-222",
                        "is_primary": true
                    }],
                    "leaves": [{ "leave_type": "annual", "start_date": "2025-08-04", "end_date": "2025-08-05" }],
                    "assets": [{ "asset_type": "laptop", "asset_tag": "LT-9" }],
                    "attachments": [{ "file_name": "id.txt", "data": "aWQ=" }]
                }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["imported"], 1, "{report}");

    for table in CHILD_TABLES {
        assert_eq!(app.count(table).await, 1, "{table} was not seeded");
    }

    let employee_id: i64 = sqlx::query_scalar("SELECT id FROM employees WHERE employee_code = 'E-300'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/employees/{}", employee_id),
            Some(&hr),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for table in CHILD_TABLES {
        assert_eq!(app.count(table).await, 0, "{table} still has rows");
    }
    assert_eq!(app.count("employees").await, 0);
}

#[tokio::test]
async fn hr_cannot_delete_employee_linked_to_admin() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("root", Role::Admin).await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    let employee = create_employee(
        &app,
        &admin,
        json!({
            "employee_code": "A-1",
            "first_name": "Jae",
            "last_name": "Yoon",
            "account": { "username": "root2", "email": "root2@example.com", "password": "password123", "role": "admin" }
        }),
    )
    .await;
    let uri = format!("/api/employees/{}", employee["id"]);

    let (status, body) = app.json(Method::DELETE, &uri, Some(&hr), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");
    assert_eq!(app.count("employees").await, 1);

    let active: bool = sqlx::query_scalar("SELECT is_active FROM users WHERE username = 'root2'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(active);

    // 다른 관리자는 삭제할 수 있습니다.
    let (status, _) = app.json(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn cannot_delete_employee_linked_to_own_account() {
    let app = TestApp::new().await;
    let (root, admin) = app.user("root", Role::Admin).await;
    let employee = create_employee(
        &app,
        &admin,
        json!({ "employee_code": "A-2", "first_name": "Dami", "last_name": "Kang" }),
    )
    .await;
    sqlx::query("UPDATE employees SET user_id = ? WHERE id = ?")
        .bind(root.id)
        .bind(employee["id"].as_i64().unwrap())
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app
        .json(
            Method::DELETE,
            &format!("/api/employees/{}", employee["id"]),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, _) = app.get("/api/auth/me", &admin).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn null_clears_optional_fields_on_update() {
    let app = TestApp::new().await;
    let (_, hr) = app.user("hana", Role::Hr).await;
    let employee = create_employee(
        &app,
        &hr,
        json!({ "employee_code": "E-400", "first_name": "Minji", "last_name": "Kim", "department": "Finance" }),
    )
    .await;
    let (status, bank) = app
        .post(
            "/api/bank-details",
            &hr,
            json!({
                "employee_id": employee["id"],
                "bank_name": "First Bank",
                "account_holder": "Minji Kim",
                "account_number": "000-111",
                "branch": "Gangnam"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bank["branch"], "Gangnam");

    let (status, cleared) = app
        .json(
            Method::PUT,
            &format!("/api/bank-details/{}", bank["id"]),
            Some(&hr),
            Some(json!({ "branch": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["branch"].is_null());
    assert_eq!(cleared["bank_name"], "First Bank");

    let (status, updated) = app
        .json(
            Method::PUT,
            &format!("/api/employees/{}", employee["id"]),
            Some(&hr),
            Some(json!({ "department": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["department"].is_null());
    assert_eq!(updated["first_name"], "Minji");
}
