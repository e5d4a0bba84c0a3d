//! Domain model for tasks, projects and notifications.
//!
//! # Responsibility
//! - Define canonical data structures held by the domain store.
//! - Fix the persisted wire naming (`camelCase` fields, kebab-case enums).
//!
//! # Invariants
//! - Every entity is identified by an opaque string id, unique within its
//!   collection.
//! - Projects reference tasks by id only; they never own task records.
//! - Every date-bearing field is a `Timestamp`, never a raw string.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod notification;
pub mod project;
pub mod task;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Calendar timestamp used by every date-bearing field.
pub type Timestamp = DateTime<Utc>;

/// Shared priority scale for tasks and projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Stable wire/string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}
