//! Historical schema revisions of the tracker.
//!
//! The tracker evolved through five shapes, each adding document keys or
//! routes to the previous one. A running service serves exactly one revision:
//! it decides the default document synthesized for a missing file, which
//! routes are mounted, and whether new tasks get server-assigned fields.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};
use thiserror::Error;

use super::document::{Document, PROGRESS_KEY, REWARDS_KEY, TASKS_KEY};

/// Returned when a revision name cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Unknown schema revision: '{0}'. Expected one of 'tasks', 'progress', 'rewards', 'bulk', 'timestamped'"
)]
pub struct UnknownRevisionError(pub String);

/// One historical snapshot of the document shape and route table.
///
/// Revisions are cumulative and ordered: every capability of an earlier
/// revision is present in the later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SchemaRevision {
    /// Task list only.
    Tasks,
    /// Adds the progress mapping.
    Progress,
    /// Adds the reward list.
    Rewards,
    /// Adds the whole-document endpoint.
    Bulk,
    /// Stamps `createdAt` on new tasks and allows updating tasks in place.
    #[default]
    Timestamped,
}

impl SchemaRevision {
    /// All revisions, oldest first.
    pub const ALL: [Self; 5] = [
        Self::Tasks,
        Self::Progress,
        Self::Rewards,
        Self::Bulk,
        Self::Timestamped,
    ];

    /// Returns the configuration name of this revision.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Progress => "progress",
            Self::Rewards => "rewards",
            Self::Bulk => "bulk",
            Self::Timestamped => "timestamped",
        }
    }

    const fn at_least(self, other: Self) -> bool {
        self as u8 >= other as u8
    }

    /// Whether the document carries a progress mapping.
    #[must_use]
    pub const fn has_progress(self) -> bool {
        self.at_least(Self::Progress)
    }

    /// Whether the document carries a reward list.
    #[must_use]
    pub const fn has_rewards(self) -> bool {
        self.at_least(Self::Rewards)
    }

    /// Whether the whole-document endpoint is served.
    #[must_use]
    pub const fn has_bulk_data(self) -> bool {
        self.at_least(Self::Bulk)
    }

    /// Whether new tasks receive server-assigned fields (`createdAt`, missing `id`).
    #[must_use]
    pub const fn stamps_new_tasks(self) -> bool {
        self.at_least(Self::Timestamped)
    }

    /// Whether `PUT /api/tasks/{id}` is served.
    #[must_use]
    pub const fn supports_task_update(self) -> bool {
        self.at_least(Self::Timestamped)
    }

    /// Progress value used when the document has none.
    #[must_use]
    pub fn default_progress() -> Value {
        json!({"level": 1, "xp": 0})
    }

    /// Document synthesized when the backing file does not exist.
    ///
    /// The result is only ever held in memory; it reaches disk with the next
    /// mutating request.
    #[must_use]
    pub fn default_document(self) -> Document {
        let mut fields = Map::new();
        fields.insert(TASKS_KEY.to_string(), Value::Array(Vec::new()));

        if self.has_progress() {
            fields.insert(PROGRESS_KEY.to_string(), Self::default_progress());
        }

        if self.has_rewards() {
            fields.insert(REWARDS_KEY.to_string(), Value::Array(Vec::new()));
        }

        Document::from_map(fields)
    }
}

impl fmt::Display for SchemaRevision {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SchemaRevision {
    type Err = UnknownRevisionError;

    /// Parses a revision by name or by its 1-based position.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "tasks" | "1" | "v1" => Ok(Self::Tasks),
            "progress" | "2" | "v2" => Ok(Self::Progress),
            "rewards" | "3" | "v3" => Ok(Self::Rewards),
            "bulk" | "data" | "4" | "v4" => Ok(Self::Bulk),
            "timestamped" | "latest" | "5" | "v5" => Ok(Self::Timestamped),
            _ => Err(UnknownRevisionError(value.to_string())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
