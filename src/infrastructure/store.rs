//! Document store trait.
//!
//! A store owns exactly one JSON document and only ever moves it whole:
//! `read` returns all of it, `write` replaces all of it. Every higher-level
//! operation is a caller-side transform between the two.

use std::path::PathBuf;

use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Document, json_type_name};

// =============================================================================
// Store Error
// =============================================================================

/// Errors that can occur while reading or writing the document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file exists but could not be read.
    #[error("Failed to read document from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file could not be overwritten.
    #[error("Failed to write document to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored bytes are not valid JSON.
    #[error("Malformed document storage: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The stored JSON is valid but is not an object.
    #[error("Stored document is {found}, expected a JSON object")]
    NotAMapping { found: &'static str },

    /// The document could not be serialized.
    #[error("Failed to serialize document: {0}")]
    Serialization(#[source] serde_json::Error),
}

// =============================================================================
// Document Store
// =============================================================================

/// Whole-document persistence for one JSON value.
///
/// Implementations perform no locking: a read-modify-write sequence spanning
/// `read` and `write` can interleave with another one and lose its update.
/// Callers that need serialization must provide it themselves.
pub trait DocumentStore: Send + Sync {
    /// Returns the full document.
    ///
    /// When nothing has been persisted yet, returns the store's default
    /// document without persisting it.
    fn read(&self) -> BoxFuture<'_, Result<Document, StoreError>>;

    /// Replaces the persisted document with `document`.
    fn write<'a>(&'a self, document: &'a Document) -> BoxFuture<'a, Result<(), StoreError>>;
}

/// Parses stored bytes into a document.
///
/// # Errors
///
/// Returns `StoreError::Malformed` for invalid JSON and
/// `StoreError::NotAMapping` for JSON that is not an object.
pub fn parse_document(bytes: &[u8]) -> Result<Document, StoreError> {
    match serde_json::from_slice::<Value>(bytes).map_err(StoreError::Malformed)? {
        Value::Object(fields) => Ok(Document::from_map(fields)),
        other => Err(StoreError::NotAMapping {
            found: json_type_name(&other),
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
