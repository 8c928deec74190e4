//! Integration tests for the task endpoints.
//!
//! # Tests Covered
//!
//! - Add / list / delete lifecycle with `createdAt` stamping
//! - Delete removes every duplicate and is idempotent
//! - Update replaces only the first match and 404s without writing
//! - Server-assigned ids for bodies without one
//! - Malformed request bodies

mod common;

use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

use common::{
    delete, get, in_memory_app, in_memory_app_with, persisted_json, post, put, send_raw,
    without_created_at,
};
use tasklevels::domain::SchemaRevision;

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_add_list_delete_lifecycle() {
    let (router, _store) = in_memory_app(SchemaRevision::Timestamped);
    let task = json!({"id": "1", "title": "Learn", "description": "x", "priority": "high"});

    let (status, created) = post(&router, "/api/tasks", task.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(without_created_at(created.clone()), task);
    assert!(created["createdAt"].is_string());

    let (status, tasks) = get(&router, "/api/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks, json!([created]));

    let (status, message) = delete(&router, "/api/tasks/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, json!({"message": "Task deleted"}));

    let (_, tasks) = get(&router, "/api/tasks").await;
    assert_eq!(tasks, json!([]));
}

#[rstest]
#[tokio::test]
async fn test_created_at_is_iso8601() {
    let (router, _store) = in_memory_app(SchemaRevision::Timestamped);

    let (_, created) = post(&router, "/api/tasks", json!({"id": "1"})).await;

    let created_at = created["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
}

#[rstest]
#[case(SchemaRevision::Tasks)]
#[case(SchemaRevision::Progress)]
#[case(SchemaRevision::Rewards)]
#[case(SchemaRevision::Bulk)]
#[tokio::test]
async fn test_earlier_revisions_store_body_verbatim(#[case] revision: SchemaRevision) {
    let (router, _store) = in_memory_app(revision);
    let task = json!({"title": "No id", "completed": false, "dueDate": "2024-06-01"});

    let (status, created) = post(&router, "/api/tasks", task.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, task);

    let (_, tasks) = get(&router, "/api/tasks").await;
    assert_eq!(tasks, json!([task]));
}

#[rstest]
#[tokio::test]
async fn test_add_assigns_id_when_missing() {
    let (router, _store) = in_memory_app(SchemaRevision::Timestamped);

    let (_, created) = post(&router, "/api/tasks", json!({"title": "Frontend task"})).await;

    let id = created["id"].as_str().expect("id should be assigned");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[rstest]
#[tokio::test]
async fn test_add_with_null_id_stays_deletable() {
    let (router, _store) = in_memory_app(SchemaRevision::Timestamped);

    let (_, created) = post(&router, "/api/tasks", json!({"id": null, "title": "Null"})).await;
    let id = created["id"].as_str().expect("id should be assigned");

    delete(&router, &format!("/api/tasks/{id}")).await;

    let (_, tasks) = get(&router, "/api/tasks").await;
    assert_eq!(tasks, json!([]));
}

#[rstest]
#[tokio::test]
async fn test_add_does_not_check_id_collisions() {
    let (router, _store) = in_memory_app(SchemaRevision::Timestamped);

    post(&router, "/api/tasks", json!({"id": "1", "title": "first"})).await;
    post(&router, "/api/tasks", json!({"id": "1", "title": "second"})).await;

    let (_, tasks) = get(&router, "/api/tasks").await;
    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[rstest]
#[tokio::test]
async fn test_list_tasks_missing_key_is_empty() {
    let (router, _store) = in_memory_app_with(SchemaRevision::Timestamped, json!({}));

    let (status, tasks) = get(&router, "/api/tasks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks, json!([]));
}

// =============================================================================
// Delete Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_delete_removes_every_duplicate() {
    let (router, store) = in_memory_app_with(
        SchemaRevision::Tasks,
        json!({"tasks": [
            {"id": "x", "n": 1},
            {"id": "y", "n": 2},
            {"id": "x", "n": 3}
        ]}),
    );

    let (status, _) = delete(&router, "/api/tasks/x").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        persisted_json(&store).await,
        json!({"tasks": [{"id": "y", "n": 2}]})
    );
}

#[rstest]
#[tokio::test]
async fn test_delete_missing_id_is_idempotent() {
    let seed = json!({"tasks": [{"id": "a"}]});
    let (router, store) = in_memory_app_with(SchemaRevision::Tasks, seed.clone());

    for _ in 0..2 {
        let (status, message) = delete(&router, "/api/tasks/missing").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(message, json!({"message": "Task deleted"}));
    }

    assert_eq!(persisted_json(&store).await, seed);
    assert_eq!(store.write_count(), 2);
}

// =============================================================================
// Update Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_update_replaces_first_match_only() {
    let (router, store) = in_memory_app_with(
        SchemaRevision::Timestamped,
        json!({"tasks": [
            {"id": "x", "title": "one"},
            {"id": "x", "title": "two"}
        ]}),
    );
    let replacement = json!({"id": "x", "title": "updated", "completed": true});

    let (status, body) = put(&router, "/api/tasks/x", replacement.clone()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, replacement);
    assert_eq!(
        persisted_json(&store).await,
        json!({"tasks": [replacement, {"id": "x", "title": "two"}]})
    );
}

#[rstest]
#[tokio::test]
async fn test_update_replaces_whole_entry() {
    let (router, _store) = in_memory_app_with(
        SchemaRevision::Timestamped,
        json!({"tasks": [{"id": "1", "title": "t", "priority": "low", "createdAt": "2024-01-01"}]}),
    );

    put(&router, "/api/tasks/1", json!({"id": "1", "title": "only title"})).await;

    let (_, tasks) = get(&router, "/api/tasks").await;
    assert_eq!(tasks, json!([{"id": "1", "title": "only title"}]));
}

#[rstest]
#[tokio::test]
async fn test_update_missing_id_returns_not_found_without_write() {
    let (router, store) =
        in_memory_app_with(SchemaRevision::Timestamped, json!({"tasks": [{"id": "1"}]}));

    let (status, body) = put(&router, "/api/tasks/2", json!({"id": "2"})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Task not found"}));
    assert_eq!(store.write_count(), 0);
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[rstest]
#[case(Method::POST, "/api/tasks", "{not json")]
#[case(Method::POST, "/api/tasks", "[1, 2]")]
#[case(Method::POST, "/api/tasks", "\"s\"")]
#[case(Method::PUT, "/api/tasks/1", "{not json")]
#[case(Method::PUT, "/api/progress", "bad")]
#[case(Method::PUT, "/api/rewards/1", "[]")]
#[tokio::test]
async fn test_malformed_body_is_server_fault_without_write(
    #[case] method: Method,
    #[case] uri: &str,
    #[case] body: &str,
) {
    let (router, store) =
        in_memory_app_with(SchemaRevision::Timestamped, json!({"tasks": [{"id": "1"}]}));

    let status = send_raw(&router, method, uri, body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.write_count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_malformed_tasks_key_is_server_fault() {
    let (router, _store) = in_memory_app_with(SchemaRevision::Timestamped, json!({"tasks": 7}));

    let (status, body) = get(&router, "/api/tasks").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, Value::Null);
}
