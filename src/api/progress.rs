//! Progress endpoints.
//!
//! Progress is an opaque mapping; PUT replaces it wholesale (no merge).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Map, Value};

use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::{PROGRESS_KEY, SchemaRevision};

/// Returns the stored progress mapping, or `{"level": 1, "xp": 0}` if none is stored.
///
/// # Errors
///
/// Returns a 500 [`ApiErrorResponse`] if the document cannot be read.
pub async fn get_progress(State(state): State<AppState>) -> Result<Json<Value>, ApiErrorResponse> {
    let document = state.store.read().await?;
    Ok(Json(
        document
            .get(PROGRESS_KEY)
            .cloned()
            .unwrap_or_else(SchemaRevision::default_progress),
    ))
}

/// Replaces the progress mapping with the request body and echoes it.
///
/// # Errors
///
/// Returns a 500 [`ApiErrorResponse`] if the body is not a JSON object or on
/// storage failure.
pub async fn put_progress(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, ApiErrorResponse> {
    let Json(progress) = body?;
    let _guard = state.lock_for_write().await;
    let mut document = state.store.read().await?;
    document.set(PROGRESS_KEY, Value::Object(progress.clone()));
    state.store.write(&document).await?;

    Ok(Json(progress))
}
