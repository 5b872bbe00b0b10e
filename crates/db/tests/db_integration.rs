//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p campus-db --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `campus_test`)
//!   `TEST_DB_PASSWORD` (default: `campus_test`)
//!   `TEST_DB_NAME` (default: `campus_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use campus_db::entities::{
    lost_found_item::{self, ItemCategory, ItemStatus, ItemType},
    user::{self, UserRole},
};
use campus_db::repositories::{
    LostFoundRepository, PersonalTimetableRepository, UserRepository,
};
use campus_db::test_utils::{TestDatabase, TestDbConfig};
use chrono::{Duration, Utc};
use sea_orm::Set;

async fn insert_user(repo: &UserRepository, id: &str) -> user::Model {
    repo.create(user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(format!("{id}@campus.edu")),
        password_hash: Set("hash".to_string()),
        name: Set(id.to_string()),
        role: Set(UserRole::Student),
        phone: Set(None),
        student_id: Set(None),
        department: Set(None),
        year: Set(None),
        token: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    })
    .await
    .unwrap()
}

fn new_item(id: &str, submitted_by: &str) -> lost_found_item::ActiveModel {
    let now = Utc::now();
    lost_found_item::ActiveModel {
        id: Set(id.to_string()),
        title: Set("Lost umbrella".to_string()),
        description: Set("Blue umbrella near the canteen".to_string()),
        item_type: Set(ItemType::Lost),
        category: Set(ItemCategory::Other),
        item_name: Set("Umbrella".to_string()),
        brand: Set(None),
        color: Set(Some("blue".to_string())),
        location: Set("Canteen".to_string()),
        date_time: Set(now),
        contact_email: Set(Some(format!("{submitted_by}@campus.edu"))),
        contact_phone: Set(None),
        submitted_by: Set(submitted_by.to_string()),
        images: Set(serde_json::json!([])),
        status: Set(ItemStatus::Active),
        claimed_by: Set(None),
        claimed_at: Set(None),
        verification_code: Set(None),
        is_reward: Set(false),
        reward_amount: Set(None),
        expiry_date: Set(now + Duration::days(30)),
        views: Set(0),
        created_at: Set(now),
        updated_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let result = TestDatabase::with_config(TestDbConfig::default()).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_claims_have_one_winner() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    let conn = Arc::new(
        sea_orm::Database::connect(&db.config.database_url())
            .await
            .expect("Failed to connect"),
    );

    let users = UserRepository::new(Arc::clone(&conn));
    insert_user(&users, "owner").await;
    insert_user(&users, "alice").await;
    insert_user(&users, "bob").await;

    let items = LostFoundRepository::new(Arc::clone(&conn));
    items.create(new_item("item1", "owner")).await.unwrap();

    let now = Utc::now();
    let (a, b) = tokio::join!(
        items.try_claim("item1", "alice", "AAAAAA", now),
        items.try_claim("item1", "bob", "BBBBBB", now),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert!(a ^ b, "exactly one claim must win");

    let stored = items.get_by_id("item1").await.unwrap();
    assert_eq!(stored.status, ItemStatus::Claimed);
    let expected_code = if a { "AAAAAA" } else { "BBBBBB" };
    assert_eq!(stored.verification_code.as_deref(), Some(expected_code));

    drop(conn);
    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_timetable_upsert_replaces_schedule() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    let conn = Arc::new(
        sea_orm::Database::connect(&db.config.database_url())
            .await
            .expect("Failed to connect"),
    );

    let users = UserRepository::new(Arc::clone(&conn));
    insert_user(&users, "student").await;

    let repo = PersonalTimetableRepository::new(Arc::clone(&conn));
    let first = repo
        .upsert("tt1".to_string(), "student", serde_json::json!({"Monday": []}), Utc::now())
        .await
        .unwrap();
    let second = repo
        .upsert("tt2".to_string(), "student", serde_json::json!({"Friday": []}), Utc::now())
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.schedule, serde_json::json!({"Friday": []}));

    drop(conn);
    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    assert!(config.postgres_url().ends_with("/postgres"));
}
