//! Domain module for the tracker.
//!
//! This module contains the persisted document, its historical schema
//! revisions, and the server-assigned task fields.

pub mod document;
pub mod revision;
pub mod task;

pub use document::{
    Document, DocumentError, ID_FIELD, PROGRESS_KEY, REWARDS_KEY, TASKS_KEY, has_id,
    json_type_name, remove_all, replace_first,
};
pub use revision::{SchemaRevision, UnknownRevisionError};
pub use task::{CREATED_AT_FIELD, ServerTaskFields, TaskId, Timestamp, stamp_task};
