//! In-memory document store.
//!
//! Stands in for the file-backed store in tests and ephemeral runs. It keeps
//! the same contract: until the first write, reads return the revision's
//! default document and nothing counts as persisted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::domain::{Document, SchemaRevision};
use crate::infrastructure::{DocumentStore, StoreError};

/// Thread-safe in-memory implementation of `DocumentStore`.
///
/// Clones share the same underlying document.
#[derive(Debug, Clone)]
pub struct InMemoryDocumentStore {
    document: Arc<RwLock<Option<Document>>>,
    revision: SchemaRevision,
    writes: Arc<AtomicU64>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store; reads return `revision`'s default document.
    #[must_use]
    pub fn new(revision: SchemaRevision) -> Self {
        Self {
            document: Arc::new(RwLock::new(None)),
            revision,
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a store that already holds `document`, as if it had been
    /// persisted earlier.
    #[must_use]
    pub fn with_document(revision: SchemaRevision, document: Document) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(document))),
            revision,
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the persisted document, or `None` if nothing was ever written.
    pub async fn persisted(&self) -> Option<Document> {
        self.document.read().await.clone()
    }

    /// Number of writes performed since creation.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn read(&self) -> BoxFuture<'_, Result<Document, StoreError>> {
        async move {
            let guard = self.document.read().await;
            Ok(guard
                .clone()
                .unwrap_or_else(|| self.revision.default_document()))
        }
        .boxed()
    }

    fn write<'a>(&'a self, document: &'a Document) -> BoxFuture<'a, Result<(), StoreError>> {
        async move {
            *self.document.write().await = Some(document.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
