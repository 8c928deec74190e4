//! Task, progress and rewards tracker.
//!
//! The whole state lives in one JSON document. Each request reads the
//! document in full, transforms it in memory, and (for mutating requests)
//! writes it back in full.

pub mod api;
pub mod domain;
pub mod infrastructure;
