//! Task value objects and server-assigned task fields.
//!
//! Tasks themselves are opaque JSON objects. The only fields the server ever
//! writes are `id` (when the caller omitted it) and `createdAt`, and only in
//! revisions that stamp new tasks.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::document::ID_FIELD;

/// Field holding the server-assigned creation time.
pub const CREATED_AT_FIELD: &str = "createdAt";

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Server-generated identifier for a task created without an `id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new time-ordered `TaskId` (UUID v7).
    ///
    /// **Note**: This is an impure function (side effect: time + random).
    #[must_use]
    pub fn generate_v7() -> Self {
        Self(Uuid::now_v7())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A timestamp wrapper for `DateTime<Utc>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the current time as a `Timestamp`.
    ///
    /// **Note**: This is an impure function (side effect: system clock).
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Formats as ISO-8601 with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.to_iso8601())
    }
}

// =============================================================================
// Server-Assigned Fields
// =============================================================================

/// Values generated at the request boundary for a new task.
#[derive(Debug, Clone)]
pub struct ServerTaskFields {
    /// Used only if the caller did not supply a string `id`.
    pub task_id: TaskId,
    /// Always overwrites any caller-supplied `createdAt`.
    pub created_at: Timestamp,
}

impl ServerTaskFields {
    /// Generates fresh fields from the clock and the UUID generator.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            task_id: TaskId::generate_v7(),
            created_at: Timestamp::now(),
        }
    }
}

/// Applies server-assigned fields to a task body.
///
/// This is a pure function: every other field passes through verbatim.
#[must_use]
pub fn stamp_task(mut task: Map<String, Value>, fields: ServerTaskFields) -> Map<String, Value> {
    // Only string ids are addressable from the task routes.
    if !task.get(ID_FIELD).is_some_and(Value::is_string) {
        task.insert(
            ID_FIELD.to_string(),
            Value::String(fields.task_id.to_string()),
        );
    }

    task.insert(
        CREATED_AT_FIELD.to_string(),
        Value::String(fields.created_at.to_iso8601()),
    );

    task
}

// =============================================================================
// Tests
// =============================================================================
