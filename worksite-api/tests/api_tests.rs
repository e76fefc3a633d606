//! Integration tests for the Worksite API
//!
//! Each test drives the real router against a real database. They are all
//! `#[ignore]`d because they need PostgreSQL reachable via `DATABASE_URL`:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/worksite_test cargo test -- --ignored
//! ```

mod common;

use axum::http::StatusCode;
use common::{create_test_project, create_test_user, TestContext, TEST_PASSWORD};
use serde_json::json;

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_login_success_hides_password_hash() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "login-ok").await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], user.email.as_str());
    // The fix for the hash leak: no password material in the response
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("password").is_none());

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_login_wrong_password_unauthorized() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "login-bad").await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": user.email, "password": "definitely-wrong" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_login_unknown_email_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "email": common::unique_email("nobody"),
                "password": TEST_PASSWORD
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_create_project_missing_owner_persists_nothing() {
    let ctx = TestContext::new().await.unwrap();
    let marker = format!("ghost-owner-project-{}", common::unique_email("m"));

    let (status, _) = ctx
        .request(
            "POST",
            "/api/projects",
            Some(json!({ "name": marker, "ownerId": i64::MAX })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE name = $1")
        .bind(&marker)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0, "no row may be persisted on a failed create");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_create_project_rejects_end_before_start() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "dates").await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/api/projects",
            Some(json!({
                "name": "Roof Repair",
                "ownerId": user.id,
                "startDate": "2024-01-01",
                "endDate": "2023-12-31"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    assert_eq!(body["error"], "validation_error");

    // Equal dates are allowed
    let (status, body) = ctx
        .request(
            "POST",
            "/api/projects",
            Some(json!({
                "name": "Roof Repair",
                "ownerId": user.id,
                "startDate": "2024-01-01",
                "endDate": "2024-01-01"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_create_project_rejects_unparsable_date() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "baddate").await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/api/projects",
            Some(json!({
                "name": "Garage",
                "ownerId": user.id,
                "startDate": "next tuesday"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_project_round_trip() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "roundtrip").await.unwrap();

    let (status, created) = ctx
        .request(
            "POST",
            "/api/projects",
            Some(json!({
                "name": "Kitchen Remodel",
                "description": "Full refit",
                "budget": 12500.0,
                "startDate": "2024-03-01",
                "ownerId": user.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", created);

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = ctx
        .request("GET", &format!("/api/projects/{}", id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Kitchen Remodel");
    assert_eq!(fetched["description"], "Full refit");
    assert_eq!(fetched["budget"], 12500.0);
    assert_eq!(fetched["ownerId"], user.id);
    assert_eq!(fetched["owner"]["email"], user.email.as_str());
    assert!(fetched["owner"].get("passwordHash").is_none());
    assert_eq!(fetched["tasks"], json!([]));
    assert_eq!(fetched["documents"], json!([]));
    assert_eq!(fetched["payments"], json!([]));

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_task_status_validation() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "status").await.unwrap();
    let project = create_test_project(&ctx, user.id, "Status project")
        .await
        .unwrap();

    // Outside the closed set
    let (status, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(json!({
                "title": "Inspect",
                "userId": user.id,
                "projectId": project.id,
                "status": "URGENT"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid status");

    // Case-insensitive match is accepted and normalized
    let (status, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(json!({
                "title": "Inspect",
                "userId": user.id,
                "projectId": project.id,
                "status": "In-Progress"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["status"], "in-progress");

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_task_status_defaults_to_pending() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "pending").await.unwrap();
    let project = create_test_project(&ctx, user.id, "Default status")
        .await
        .unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(json!({
                "title": "Order materials",
                "userId": user.id,
                "projectId": project.id
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["status"], "pending");

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_nested_create_under_missing_project_is_404() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "nested-404").await.unwrap();

    let cases = [
        (
            format!("/api/projects/{}/tasks", i64::MAX),
            json!({ "title": "Task", "userId": user.id }),
        ),
        (
            format!("/api/projects/{}/documents", i64::MAX),
            json!({ "title": "Doc", "text": "body" }),
        ),
        (
            format!("/api/projects/{}/payments", i64::MAX),
            json!({ "amount": 100.0, "method": "cash" }),
        ),
    ];

    for (uri, body) in cases {
        let (status, _) = ctx.request("POST", &uri, Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {}", uri);
    }

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_nested_create_attaches_to_parent() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "nested-ok").await.unwrap();
    let project = create_test_project(&ctx, user.id, "Nested parent")
        .await
        .unwrap();

    let (status, task) = ctx
        .request(
            "POST",
            &format!("/api/projects/{}/tasks", project.id),
            Some(json!({ "title": "Frame walls", "userId": user.id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", task);
    assert_eq!(task["projectId"], project.id);

    let (status, document) = ctx
        .request(
            "POST",
            &format!("/api/projects/{}/documents", project.id),
            Some(json!({ "title": "Permit", "text": "Approved by the county." })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", document);
    assert_eq!(document["projectId"], project.id);

    let (status, payment) = ctx
        .request(
            "POST",
            &format!("/api/projects/{}/payments", project.id),
            Some(json!({ "amount": 750.5, "method": "bank transfer" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", payment);
    assert_eq!(payment["projectId"], project.id);

    // All three show up on the parent
    let (status, fetched) = ctx
        .request("GET", &format!("/api/projects/{}", project.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(fetched["documents"].as_array().unwrap().len(), 1);
    assert_eq!(fetched["payments"].as_array().unwrap().len(), 1);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_payment_rejects_non_positive_amount() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "amount").await.unwrap();
    let project = create_test_project(&ctx, user.id, "Amount project")
        .await
        .unwrap();

    for amount in [0.0, -25.0] {
        let (status, _) = ctx
            .request(
                "POST",
                "/api/payments",
                Some(json!({
                    "amount": amount,
                    "method": "cash",
                    "projectId": project.id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount: {}", amount);
    }

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_delete_missing_resources_return_404() {
    let ctx = TestContext::new().await.unwrap();

    for uri in [
        format!("/api/projects/{}", i64::MAX),
        format!("/api/tasks/{}", i64::MAX),
        format!("/api/documents/{}", i64::MAX),
        format!("/api/payments/{}", i64::MAX),
        format!("/api/users/{}", i64::MAX),
    ] {
        let (status, _) = ctx.request("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {}", uri);
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_delete_project_with_children_conflicts() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "restrict").await.unwrap();
    let project = create_test_project(&ctx, user.id, "Has children")
        .await
        .unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/api/projects/{}/documents", project.id),
            Some(json!({ "title": "Contract", "text": "Signed." })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = ctx
        .request("DELETE", &format!("/api/projects/{}", project.id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_create_user_duplicate_email_conflicts() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("dup");

    let (status, body) = ctx
        .request(
            "POST",
            "/api/users",
            Some(json!({ "name": "First", "email": email, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    let user_id = body["id"].as_i64().unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/api/users",
            Some(json!({ "name": "Second", "email": email, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup_user(user_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_task_update_keeps_status_when_absent() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "task-update").await.unwrap();
    let project = create_test_project(&ctx, user.id, "Update project")
        .await
        .unwrap();

    let (status, task) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(json!({
                "title": "Paint",
                "userId": user.id,
                "projectId": project.id,
                "status": "completed"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = task["id"].as_i64().unwrap();

    // Update without a status must not default it back to pending
    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(json!({ "title": "Paint twice" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", updated);
    assert_eq!(updated["title"], "Paint twice");
    assert_eq!(updated["status"], "completed");

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_document_get_includes_parent_project() {
    let ctx = TestContext::new().await.unwrap();
    let user = create_test_user(&ctx, "doc").await.unwrap();
    let project = create_test_project(&ctx, user.id, "Doc project")
        .await
        .unwrap();

    let (status, created) = ctx
        .request(
            "POST",
            "/api/documents",
            Some(json!({
                "title": "Site survey",
                "text": "Everything level.",
                "projectId": project.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", created);

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = ctx
        .request("GET", &format!("/api/documents/{}", id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Site survey");
    assert_eq!(fetched["project"]["id"], project.id);
    assert_eq!(fetched["project"]["name"], "Doc project");

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_health_and_liveness() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "connected");

    let (status, _) = ctx.request("GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_unmatched_route_returns_json_404() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/api/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_malformed_json_body_is_400() {
    let ctx = TestContext::new().await.unwrap();

    // Wrong type for a field: budget as string
    let (status, _) = ctx
        .request(
            "POST",
            "/api/projects",
            Some(json!({ "name": "Typed", "ownerId": 1, "budget": "a lot" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
