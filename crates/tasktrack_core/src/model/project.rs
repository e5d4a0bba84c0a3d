//! Project domain model.
//!
//! # Responsibility
//! - Define the project record and its relational task references.
//!
//! # Invariants
//! - `tasks` holds task ids; the referenced tasks are owned by the task
//!   collection.
//! - `progress` is within `0..=100`.

use super::task::TaskId;
use super::{Priority, Timestamp};
use serde::{Deserialize, Serialize};

/// Opaque project identifier.
pub type ProjectId = String;

/// Project lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
        }
    }
}

/// Canonical project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    /// Task references, not owned records.
    pub tasks: Vec<TaskId>,
    pub progress: u8,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    /// Team member ids.
    pub team: Vec<String>,
    pub status: ProjectStatus,
    pub priority: Priority,
}

impl Project {
    /// Returns whether this project references the given task id.
    pub fn references_task(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|id| id == task_id)
    }

    /// Drops every reference to `task_id`, returning whether any was removed.
    pub fn remove_task_reference(&mut self, task_id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|id| id != task_id);
        self.tasks.len() != before
    }
}
