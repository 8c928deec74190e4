//! Task endpoints.
//!
//! Not-found policy: update reports a missing id with 404 and writes nothing;
//! delete never reports one and always rewrites the document.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Map, Value};

use super::error::ApiErrorResponse;
use super::handlers::{AppState, MessageResponse};
use crate::domain::{
    ID_FIELD, ServerTaskFields, TASKS_KEY, remove_all, replace_first, stamp_task,
};

/// Confirmation returned by every delete, whether or not anything matched.
pub const TASK_DELETED_MESSAGE: &str = "Task deleted";

// =============================================================================
// GET /api/tasks Handler
// =============================================================================

/// Lists all tasks in stored order.
///
/// # Errors
///
/// Returns a 500 [`ApiErrorResponse`] if the document cannot be read or its
/// `tasks` key is not an array.
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiErrorResponse> {
    let document = state.store.read().await?;
    Ok(Json(document.collection(TASKS_KEY)?.to_vec()))
}

// =============================================================================
// POST /api/tasks Handler
// =============================================================================

/// Appends the request body to the task list and echoes it.
///
/// Ids are not checked for collisions. In revisions that stamp new tasks,
/// `createdAt` is set to the current time and a UUIDv7 `id` is assigned when
/// the body has none; otherwise the body is stored verbatim.
///
/// # Errors
///
/// Returns a 500 [`ApiErrorResponse`] if the body is not a JSON object or on
/// storage failure.
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, ApiErrorResponse> {
    let Json(task) = body?;
    let task = if state.revision.stamps_new_tasks() {
        stamp_task(task, ServerTaskFields::generate())
    } else {
        task
    };

    let _guard = state.lock_for_write().await;
    let mut document = state.store.read().await?;
    document
        .collection_mut(TASKS_KEY)?
        .push(Value::Object(task.clone()));
    state.store.write(&document).await?;

    tracing::debug!(id = ?task.get(ID_FIELD), "Task added");
    Ok(Json(task))
}

// =============================================================================
// PUT /api/tasks/{id} Handler
// =============================================================================

/// Replaces the first task whose `id` matches the path with the request body.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] in the following cases:
/// - No task has the id (404 Not Found, `{"error": "Task not found"}`); nothing is written
/// - Body is not a JSON object, or storage failure (500 Internal Server Error)
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, ApiErrorResponse> {
    let Json(task) = body?;
    let _guard = state.lock_for_write().await;
    let mut document = state.store.read().await?;

    let tasks = document.collection_mut(TASKS_KEY)?;
    if !replace_first(tasks, &task_id, Value::Object(task.clone())) {
        return Err(ApiErrorResponse::not_found("Task"));
    }

    state.store.write(&document).await?;

    tracing::debug!(%task_id, "Task updated");
    Ok(Json(task))
}

// =============================================================================
// DELETE /api/tasks/{id} Handler
// =============================================================================

/// Removes every task whose `id` matches the path.
///
/// Always answers `{"message": "Task deleted"}`, including when nothing matched.
///
/// # Errors
///
/// Returns a 500 [`ApiErrorResponse`] on storage failure.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    let _guard = state.lock_for_write().await;
    let mut document = state.store.read().await?;

    let removed = remove_all(document.collection_mut(TASKS_KEY)?, &task_id);
    state.store.write(&document).await?;

    tracing::debug!(%task_id, removed, "Task delete processed");
    Ok(Json(MessageResponse::new(TASK_DELETED_MESSAGE)))
}

// =============================================================================
// Tests
// =============================================================================
