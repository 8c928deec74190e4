//! Common test helpers for integration tests.
//!
//! Builds routers over in-memory or file-backed stores and sends JSON
//! requests through them with `tower::ServiceExt::oneshot`.
//!
//! # Note
//!
//! Each integration test file compiles as its own crate, so helpers used by
//! only some files would otherwise trigger dead code warnings.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tasklevels::api::{AppState, build_router};
use tasklevels::domain::{Document, SchemaRevision};
use tasklevels::infrastructure::{InMemoryDocumentStore, JsonFileStore};

// =============================================================================
// App Creation Helpers
// =============================================================================

/// Router over an empty in-memory store, plus a handle to inspect the store.
pub fn in_memory_app(revision: SchemaRevision) -> (Router, InMemoryDocumentStore) {
    let store = InMemoryDocumentStore::new(revision);
    let state = AppState::new(Arc::new(store.clone()), revision);
    (build_router(state), store)
}

/// Router over an in-memory store that already holds `document`.
pub fn in_memory_app_with(
    revision: SchemaRevision,
    document: Value,
) -> (Router, InMemoryDocumentStore) {
    let document: Document =
        serde_json::from_value(document).expect("Seed document must be a JSON object");
    let store = InMemoryDocumentStore::with_document(revision, document);
    let state = AppState::new(Arc::new(store.clone()), revision);
    (build_router(state), store)
}

/// Router over a JSON file at `path`.
pub fn file_app(path: &Path, revision: SchemaRevision) -> Router {
    let state = AppState::new(Arc::new(JsonFileStore::new(path, revision)), revision);
    build_router(state)
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Sends one request and returns the status and the JSON body.
///
/// An empty body is returned as `Value::Null`.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    if bytes.is_empty() {
        return (status, Value::Null);
    }

    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Sends a request with a raw, possibly invalid, JSON body.
pub async fn send_raw(router: &Router, method: Method, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");

    router
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible")
        .status()
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

pub async fn put(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::PUT, uri, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::DELETE, uri, None).await
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Returns the persisted document as JSON, panicking if nothing was written.
pub async fn persisted_json(store: &InMemoryDocumentStore) -> Value {
    let document = store
        .persisted()
        .await
        .expect("Expected a persisted document");
    serde_json::to_value(document).expect("Document serializes")
}

/// Removes `createdAt` so stamped tasks can be compared to request bodies.
pub fn without_created_at(mut task: Value) -> Value {
    if let Some(fields) = task.as_object_mut() {
        fields.remove("createdAt");
    }
    task
}
