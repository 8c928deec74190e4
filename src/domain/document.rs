//! The persisted document and its entity collections.
//!
//! A `Document` is the single JSON mapping the tracker keeps on disk. Its
//! entries (tasks, rewards, progress) are stored opaquely: nothing here
//! validates field names or types beyond what a transform strictly needs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// =============================================================================
// Keys
// =============================================================================

/// Key of the task collection.
pub const TASKS_KEY: &str = "tasks";

/// Key of the progress mapping.
pub const PROGRESS_KEY: &str = "progress";

/// Key of the reward collection.
pub const REWARDS_KEY: &str = "rewards";

/// Field that identifies an entry inside a collection.
pub const ID_FIELD: &str = "id";

// =============================================================================
// Document Error
// =============================================================================

/// Errors raised when the document does not have the shape a transform expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A collection key holds something other than an array.
    #[error("Document key '{key}' holds {found}, expected an array")]
    NotAnArray { key: String, found: &'static str },
}

// =============================================================================
// Document
// =============================================================================

/// The whole persisted state of the tracker.
///
/// Serializes transparently as the underlying JSON object, so a document
/// round-trips through `serde_json` without any wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Wraps an existing JSON object.
    #[must_use]
    pub const fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the document, returning the underlying JSON object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Replaces the value stored under `key` wholesale.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Returns the collection stored under `key`.
    ///
    /// An absent key reads as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotAnArray` if the key holds a non-array value.
    pub fn collection(&self, key: &str) -> Result<&[Value], DocumentError> {
        match self.0.get(key) {
            None => Ok(&[]),
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => Err(DocumentError::NotAnArray {
                key: key.to_string(),
                found: json_type_name(other),
            }),
        }
    }

    /// Returns the collection stored under `key` for mutation.
    ///
    /// An absent key is materialized as an empty array first.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotAnArray` if the key holds a non-array value.
    pub fn collection_mut(&mut self, key: &str) -> Result<&mut Vec<Value>, DocumentError> {
        match self
            .0
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(entries) => Ok(entries),
            other => Err(DocumentError::NotAnArray {
                key: key.to_string(),
                found: json_type_name(other),
            }),
        }
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

// =============================================================================
// Collection Transforms
// =============================================================================

/// Returns true if `entry` carries the string id `id`.
///
/// Entries whose id is missing or not a string never match.
#[must_use]
pub fn has_id(entry: &Value, id: &str) -> bool {
    entry.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

/// Replaces the first entry whose id equals `id`.
///
/// Later entries sharing the id are left untouched. Returns false when no
/// entry matched, in which case `entries` is unchanged.
pub fn replace_first(entries: &mut [Value], id: &str, replacement: Value) -> bool {
    match entries.iter_mut().find(|entry| has_id(entry, id)) {
        Some(slot) => {
            *slot = replacement;
            true
        }
        None => false,
    }
}

/// Removes every entry whose id equals `id`, returning how many were dropped.
pub fn remove_all(entries: &mut Vec<Value>, id: &str) -> usize {
    let before = entries.len();
    entries.retain(|entry| !has_id(entry, id));
    before - entries.len()
}

/// Names the JSON type of `value` for error messages.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Tests
// =============================================================================
