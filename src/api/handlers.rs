//! Shared handler state and service-level endpoints.
//!
//! Every entity handler follows the same shape: read the whole document,
//! transform it in memory, write it back (mutating verbs only), and echo the
//! transformed value.

use std::sync::Arc;

use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::SchemaRevision;
use crate::infrastructure::{DocumentStore, StoreConfig};

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// The store is injected as a trait object so the file-backed store and the
/// in-memory store are interchangeable.
#[derive(Clone)]
pub struct AppState {
    /// Document store for persistence.
    pub store: Arc<dyn DocumentStore>,
    /// Schema revision served.
    pub revision: SchemaRevision,
    /// Held across read-modify-write sequences when write serialization is on.
    write_lock: Option<Arc<Mutex<()>>>,
}

impl AppState {
    /// Creates a new `AppState` without write serialization.
    ///
    /// Concurrent mutating requests race:
    /// the last writer wins and earlier updates may be lost.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, revision: SchemaRevision) -> Self {
        Self {
            store,
            revision,
            write_lock: None,
        }
    }

    /// Creates a new `AppState` from loaded configuration.
    #[must_use]
    pub fn from_config(store: Arc<dyn DocumentStore>, config: &StoreConfig) -> Self {
        let state = Self::new(store, config.revision);
        if config.serialize_writes {
            state.with_write_serialization()
        } else {
            state
        }
    }

    /// Serializes every read-modify-write sequence behind a single mutex.
    #[must_use]
    pub fn with_write_serialization(mut self) -> Self {
        self.write_lock = Some(Arc::new(Mutex::new(())));
        self
    }

    /// Whether write serialization is enabled.
    #[must_use]
    pub const fn serializes_writes(&self) -> bool {
        self.write_lock.is_some()
    }

    /// Acquires the write lock if serialization is enabled.
    ///
    /// Hold the returned guard until the document has been written back.
    pub(crate) async fn lock_for_write(&self) -> Option<OwnedMutexGuard<()>> {
        match &self.write_lock {
            Some(lock) => Some(Arc::clone(lock).lock_owned().await),
            None => None,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppState")
            .field("store", &"Arc<dyn DocumentStore>")
            .field("revision", &self.revision)
            .field("serialize_writes", &self.serializes_writes())
            .finish()
    }
}

// =============================================================================
// Shared Response Bodies
// =============================================================================

/// Fixed confirmation body, serialized as `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a new message response.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// Does not touch the store.
///
/// # Response
///
/// - **200 OK**: `{"status": "healthy", "version": "0.1.0"}`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Tests
// =============================================================================
