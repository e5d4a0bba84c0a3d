//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its optional advisory/collaboration fields.
//!
//! # Invariants
//! - `id` is set before a task enters the store.
//! - `progress`, when set, is within `0..=100`.
//! - `tags`, `ai_suggestions` and `comments` keep caller order.

use super::{Priority, Timestamp};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque task identifier.
pub type TaskId = String;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Created but not started.
    Todo,
    /// Work is in progress.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// Stable wire/string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

/// Comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: String,
    pub created_at: Timestamp,
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Timestamp,
    /// Free-text identity, not a user id.
    pub assignee: String,
    pub tags: Vec<String>,
    /// Advisory only; never drives behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggestions: Option<Vec<String>>,
    /// Percentage in `0..=100`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    ProgressOutOfRange(u8),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id cannot be empty"),
            Self::ProgressOutOfRange(value) => {
                write!(f, "task progress ({value}) must be within 0..=100")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates a task with required fields and empty optional projections.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        status: TaskStatus,
        priority: Priority,
        due_date: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status,
            priority,
            due_date,
            assignee: String::new(),
            tags: Vec::new(),
            ai_suggestions: None,
            progress: None,
            attachments: None,
            comments: None,
        }
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if let Some(progress) = self.progress {
            if progress > 100 {
                return Err(TaskValidationError::ProgressOutOfRange(progress));
            }
        }
        Ok(())
    }
}
