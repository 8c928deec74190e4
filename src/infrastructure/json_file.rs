//! File-backed document store.
//!
//! The document lives in one JSON file. Every read parses the whole file and
//! every write truncates and rewrites it in place, so edits made to the file
//! between requests are picked up by the next read. There is no
//! temp-file-then-rename step: a crash mid-write can leave a truncated file.

use std::io;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::domain::{Document, SchemaRevision};
use crate::infrastructure::{DocumentStore, StoreError, parse_document};

/// Document store persisting to a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    revision: SchemaRevision,
}

impl JsonFileStore {
    /// Creates a store for `path`, synthesizing `revision`'s default document
    /// while the file does not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, revision: SchemaRevision) -> Self {
        Self {
            path: path.into(),
            revision,
        }
    }

    /// Returns the backing path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn read(&self) -> BoxFuture<'_, Result<Document, StoreError>> {
        async move {
            let bytes = match tokio::fs::read(&self.path).await {
                Ok(bytes) => bytes,
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(
                        path = %self.path.display(),
                        revision = %self.revision,
                        "Document file absent, using default document"
                    );
                    return Ok(self.revision.default_document());
                }
                Err(source) => {
                    return Err(StoreError::Read {
                        path: self.path.clone(),
                        source,
                    });
                }
            };

            parse_document(&bytes)
        }
        .boxed()
    }

    fn write<'a>(&'a self, document: &'a Document) -> BoxFuture<'a, Result<(), StoreError>> {
        async move {
            let payload = serde_json::to_vec(document).map_err(StoreError::Serialization)?;

            tokio::fs::write(&self.path, &payload)
                .await
                .map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;

            tracing::debug!(
                path = %self.path.display(),
                bytes = payload.len(),
                "Document written"
            );
            Ok(())
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
