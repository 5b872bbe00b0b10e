//! API integration tests.
//!
//! Drive the full router (envelope, auth middleware, extractors) against a
//! mock database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use campus_api::{AppState, app};
use campus_core::{
    AnnouncementService, ComplaintService, DepartmentTimetableService, LostFoundService,
    TimetableLayout, TimetableService, UserService,
};
use campus_db::{
    entities::{
        announcement, complaint,
        lost_found_item::{self, ItemCategory, ItemStatus, ItemType},
        user::{self, UserRole},
    },
    repositories::{
        AnnouncementRepository, ComplaintRepository, DepartmentTimetableRepository,
        LostFoundRepository, PersonalTimetableRepository, UserRepository,
    },
};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;

const TOKEN: &str = "0123456789abcdef0123456789abcdef";

fn create_test_user(id: &str, role: UserRole) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@campus.edu"),
        password_hash: String::new(),
        name: "Test User".to_string(),
        role,
        phone: Some("9876543210".to_string()),
        student_id: None,
        department: None,
        year: Some(2),
        token: Some(TOKEN.to_string()),
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn create_test_item(id: &str, submitted_by: &str) -> lost_found_item::Model {
    let now = Utc::now();
    lost_found_item::Model {
        id: id.to_string(),
        title: "Blue umbrella".to_string(),
        description: "Left in lecture hall B".to_string(),
        item_type: ItemType::Found,
        category: ItemCategory::Accessories,
        item_name: "Umbrella".to_string(),
        brand: None,
        color: Some("blue".to_string()),
        location: "Hall B".to_string(),
        date_time: now,
        contact_email: Some(format!("{submitted_by}@campus.edu")),
        contact_phone: None,
        submitted_by: submitted_by.to_string(),
        images: json!([]),
        status: ItemStatus::Active,
        claimed_by: None,
        claimed_at: None,
        verification_code: Some("SECRET".to_string()),
        is_reward: false,
        reward_amount: None,
        expiry_date: now + Duration::days(30),
        views: 0,
        created_at: now,
        updated_at: None,
    }
}

fn create_test_state(db: DatabaseConnection, allow_registration: bool) -> AppState {
    let db = Arc::new(db);

    AppState {
        user_service: UserService::new(UserRepository::new(Arc::clone(&db)), allow_registration),
        lost_found_service: LostFoundService::new(LostFoundRepository::new(Arc::clone(&db)), 30),
        timetable_service: TimetableService::new(
            PersonalTimetableRepository::new(Arc::clone(&db)),
            TimetableLayout::default(),
        ),
        department_timetable_service: DepartmentTimetableService::new(
            DepartmentTimetableRepository::new(Arc::clone(&db)),
        ),
        announcement_service: AnnouncementService::new(AnnouncementRepository::new(Arc::clone(
            &db,
        ))),
        complaint_service: ComplaintService::new(ComplaintRepository::new(db)),
    }
}

fn create_test_router(db: MockDatabase) -> Router {
    app(create_test_state(db.into_connection(), true))
}

/// Mock database whose first query resolves the bearer token to `user`.
fn authed_db(user: user::Model) -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]])
}

fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_returns_401_envelope() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/lost-found")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()]);
    let app = create_test_router(db);

    let response = app.oneshot(request("GET", "/api/auth/me", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_hides_secrets() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let response = app.oneshot(request("GET", "/api/auth/me", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["id"], "u1");
    assert_eq!(body["data"]["role"], "student");
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("token").is_none());
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let response = app
        .oneshot(request("POST", "/api/complaints", Some("{not json")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_field_is_rejected() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let payload = json!({
        "title": "Broken fan",
        "description": "Fan in room 12 is broken",
        "category": "hostel",
        "severity": "high"
    });
    let response = app
        .oneshot(request("POST", "/api/complaints", Some(&payload.to_string())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("severity"));
}

#[tokio::test]
async fn test_invalid_timetable_names_day_and_writes_nothing() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let payload = json!({
        "schedule": {
            "Monday": [{
                "subject": "Math", "instructor": "Dr. A", "room": "101",
                "startTime": "09:00", "endTime": "10:00", "color": "#3B82F6"
            }],
            "Tuesday": [{
                "subject": "Physics", "instructor": "Dr. B", "room": "202",
                "startTime": "25:00", "endTime": "26:00", "color": "#3B82F6"
            }]
        }
    });
    let response = app
        .oneshot(request(
            "PUT",
            "/api/personal-timetable",
            Some(&payload.to_string()),
        ))
        .await
        .unwrap();

    // Only the token lookup was mocked; a write would have failed with 500.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("Tuesday"));
}

#[tokio::test]
async fn test_empty_timetable_layout_has_all_days() {
    let db = authed_db(create_test_user("u1", UserRole::Student))
        .append_query_results([Vec::<campus_db::entities::personal_timetable::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/api/personal-timetable/layout", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["baseHour"], 8);
    assert_eq!(body["data"]["pixelsPerHour"], 60);
    assert_eq!(body["data"]["days"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_claiming_own_item_is_forbidden() {
    let db = authed_db(create_test_user("u1", UserRole::Student))
        .append_query_results([[create_test_item("item1", "u1")]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("POST", "/api/lost-found/item1/claim", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_claim_of_missing_item_is_404() {
    let db = authed_db(create_test_user("u2", UserRole::Student))
        .append_query_results([Vec::<lost_found_item::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("POST", "/api/lost-found/missing/claim", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_item_view_hides_code_from_non_claimant() {
    let db = authed_db(create_test_user("u3", UserRole::Student))
        .append_query_results([[create_test_item("item1", "u1")]])
        .append_exec_results([sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/api/lost-found/item1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["type"], "found");
    assert_eq!(body["data"]["contactInfo"]["email"], "u1@campus.edu");
    assert!(body["data"].get("verificationCode").is_none());
}

#[tokio::test]
async fn test_update_item_rejects_status_change() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let response = app
        .oneshot(request(
            "PUT",
            "/api/lost-found/item1",
            Some(r#"{"status":"returned"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_student_cannot_create_announcement() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let payload = json!({
        "title": "Holiday",
        "content": "Campus closed on Friday",
        "category": "general"
    });
    let response = app
        .oneshot(request(
            "POST",
            "/api/announcements",
            Some(&payload.to_string()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_cannot_view_stats() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let response = app
        .oneshot(request("GET", "/api/complaints/stats/overview", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_like_of_missing_announcement_is_404() {
    let db = authed_db(create_test_user("u1", UserRole::Student))
        .append_query_results([Vec::<announcement::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("POST", "/api/announcements/missing/like", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_on_missing_complaint_is_404() {
    let db = authed_db(create_test_user("u1", UserRole::Student))
        .append_query_results([Vec::<complaint::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request(
            "POST",
            "/api/complaints/missing/comments",
            Some(r#"{"message":"Any update?"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_comment_is_rejected() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let response = app
        .oneshot(request(
            "POST",
            "/api/complaints/c1/comments",
            Some(r#"{"message":""}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_student_cannot_list_timetable_departments() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let response = app
        .oneshot(request("GET", "/api/timetable/departments/list", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_departments_list() {
    let db = authed_db(create_test_user("admin", UserRole::Admin)).append_query_results([vec![
        maplit::btreemap! {
            "department" => sea_orm::Value::String(Some(Box::new("CSE".to_string()))),
        },
    ]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/api/timetable/departments/list", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"], json!(["CSE"]));
}

#[tokio::test]
async fn test_invalid_page_limit_is_rejected() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let response = app
        .oneshot(request("GET", "/api/complaints?limit=0", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_huge_page_is_rejected_not_fatal() {
    let app = create_test_router(authed_db(create_test_user("u1", UserRole::Student)));

    let response = app
        .oneshot(request(
            "GET",
            "/api/lost-found?page=18446744073709551615&limit=100",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_registration_closed() {
    let state = create_test_state(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        false,
    );
    let payload = json!({
        "name": "New Student",
        "email": "new@campus.edu",
        "password": "secret123"
    });

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
