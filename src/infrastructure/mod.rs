//! Infrastructure module for document persistence.
//!
//! This module contains the document store trait, its file-backed and
//! in-memory implementations, and the factory that selects between them.

pub mod factory;
pub mod in_memory;
pub mod json_file;
pub mod store;

pub use factory::{
    ConfigurationError, DEFAULT_DATA_FILE, FactoryError, StorageMode, StoreConfig,
    StoreConfigBuilder, StoreFactory,
};
pub use in_memory::InMemoryDocumentStore;
pub use json_file::JsonFileStore;
pub use store::{DocumentStore, StoreError, parse_document};
