//! API error handling.
//!
//! Only two outcomes reach clients as errors: a structured 404 for updates
//! aimed at a missing id, and a bare 500 for every other fault, including
//! request bodies that do not decode. The cause of a 500 is logged, never sent.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::DocumentError;
use crate::infrastructure::StoreError;

// =============================================================================
// API Error
// =============================================================================

/// Error body, serialized as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// Creates a new API error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// Status code plus optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Error body; `None` sends an empty body.
    pub error: Option<ApiError>,
}

impl ApiErrorResponse {
    /// Creates a new API error response.
    #[must_use]
    pub const fn new(status: StatusCode, error: Option<ApiError>) -> Self {
        Self { status, error }
    }

    /// Creates a 404 Not Found response, e.g. `{"error": "Task not found"}`.
    #[must_use]
    pub fn not_found(entity: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            Some(ApiError::new(format!("{entity} not found"))),
        )
    }

    /// Creates a 500 Internal Server Error response with no body.
    #[must_use]
    pub const fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, None)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        match self.error {
            Some(error) => (self.status, Json(error)).into_response(),
            None => self.status.into_response(),
        }
    }
}

impl From<StoreError> for ApiErrorResponse {
    fn from(error: StoreError) -> Self {
        tracing::error!(%error, "Document store failure");
        Self::internal_error()
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        tracing::error!(error = %rejection.body_text(), "Request body could not be decoded");
        Self::internal_error()
    }
}

impl From<DocumentError> for ApiErrorResponse {
    fn from(error: DocumentError) -> Self {
        tracing::error!(%error, "Stored document has an unexpected shape");
        Self::internal_error()
    }
}

// =============================================================================
// Tests
// =============================================================================
