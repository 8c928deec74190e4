//! Whole-document endpoints.
//!
//! `GET /api/data` returns the document as stored; `POST /api/data` replaces
//! it verbatim, with no merge and no validation of its keys.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use super::error::ApiErrorResponse;
use super::handlers::{AppState, MessageResponse};
use crate::domain::Document;

/// Confirmation returned after the document has been replaced.
pub const DATA_SAVED_MESSAGE: &str = "Data saved successfully";

/// Returns the entire document.
///
/// # Errors
///
/// Returns a 500 [`ApiErrorResponse`] if the document cannot be read.
pub async fn get_data(State(state): State<AppState>) -> Result<Json<Document>, ApiErrorResponse> {
    Ok(Json(state.store.read().await?))
}

/// Replaces the entire document with the request body.
///
/// # Errors
///
/// Returns a 500 [`ApiErrorResponse`] if the body is not a JSON object or the
/// document cannot be written.
pub async fn save_data(
    State(state): State<AppState>,
    body: Result<Json<Document>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    let Json(document) = body?;
    let _guard = state.lock_for_write().await;
    state.store.write(&document).await?;

    tracing::debug!(keys = document.as_map().len(), "Document replaced");
    Ok(Json(MessageResponse::new(DATA_SAVED_MESSAGE)))
}
