//! Task/project/notification/comment intake.

use crate::ids::IdError;
use crate::model::notification::{Notification, NotificationKind};
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Comment, Task, TaskStatus, TaskValidationError};
use crate::model::{Priority, Timestamp};
use crate::storage::KeyValueStore;
use crate::store::Store;
use chrono::Duration;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Advisory suggestion attached to every task created through intake.
pub const DEFAULT_TASK_SUGGESTION: &str = "Consider breaking this task into smaller subtasks";

/// Default project length when no end date is given.
pub const DEFAULT_PROJECT_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    EmptyTitle,
    EmptyName,
    EmptyComment,
    DueDateInPast { due: Timestamp, now: Timestamp },
    InvalidTask(TaskValidationError),
    Id(IdError),
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyName => write!(f, "project name cannot be empty"),
            Self::EmptyComment => write!(f, "comment text cannot be empty"),
            Self::DueDateInPast { due, now } => {
                write!(f, "due date {due} cannot be before {now}")
            }
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::Id(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DraftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Id(err) => Some(err),
            Self::InvalidTask(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for DraftError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}

impl From<IdError> for DraftError {
    fn from(value: IdError) -> Self {
        Self::Id(value)
    }
}

/// Raw task form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Timestamp,
    pub assignee: String,
    /// Comma-separated tag input.
    pub tags: String,
    pub progress: Option<u8>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due_date: Timestamp) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date,
            assignee: String::new(),
            tags: String::new(),
            progress: None,
        }
    }
}

/// Raw project form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
}

/// Splits comma-separated tag input; blank pieces are dropped.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rejects due dates earlier than `now`.
pub fn validate_due_date(due: Timestamp, now: Timestamp) -> Result<(), DraftError> {
    if due < now {
        return Err(DraftError::DueDateInPast { due, now });
    }
    Ok(())
}

impl<S: KeyValueStore> Store<S> {
    /// Validates a task draft, allocates its id and appends it.
    pub fn create_task(&mut self, draft: TaskDraft, now: Timestamp) -> Result<Task, DraftError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        validate_due_date(draft.due_date, now)?;

        let task = Task {
            id: self.allocate_task_id()?,
            title: title.to_string(),
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            assignee: draft.assignee.trim().to_string(),
            tags: parse_tags(&draft.tags),
            ai_suggestions: Some(vec![DEFAULT_TASK_SUGGESTION.to_string()]),
            progress: draft.progress,
            attachments: None,
            comments: None,
        };
        task.validate()?;
        self.add_task(task.clone());
        Ok(task)
    }

    /// Creates an active, medium-priority project spanning the default
    /// length from `now`.
    pub fn create_project(
        &mut self,
        draft: ProjectDraft,
        now: Timestamp,
    ) -> Result<Project, DraftError> {
        if draft.name.trim().is_empty() {
            return Err(DraftError::EmptyName);
        }

        let project = Project {
            id: self.allocate_project_id()?,
            name: draft.name,
            description: draft.description,
            tasks: Vec::new(),
            progress: 0,
            start_date: now,
            end_date: now + Duration::days(DEFAULT_PROJECT_DAYS),
            team: Vec::new(),
            status: ProjectStatus::Active,
            priority: Priority::Medium,
        };
        self.add_project(project.clone());
        Ok(project)
    }

    /// Builds an unread notification and prepends it.
    pub fn notify(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: Timestamp,
    ) -> Result<Notification, DraftError> {
        let notification = Notification::new(self.allocate_notification_id()?, kind, message, now);
        self.add_notification(notification.clone());
        Ok(notification)
    }

    /// Appends a comment to a task. Returns `Ok(None)` when the task is absent.
    pub fn add_comment(
        &mut self,
        task_id: &str,
        text: &str,
        author: &str,
        now: Timestamp,
    ) -> Result<Option<Comment>, DraftError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DraftError::EmptyComment);
        }
        let Some(mut task) = self.task(task_id).cloned() else {
            return Ok(None);
        };

        let existing = task.comments.clone().unwrap_or_default();
        let comment = Comment {
            id: self.allocate_nested_id(|candidate| existing.iter().any(|c| c.id == candidate))?,
            text: text.to_string(),
            author: author.to_string(),
            created_at: now,
        };
        task.comments
            .get_or_insert_with(Vec::new)
            .push(comment.clone());
        self.update_task(task);
        Ok(Some(comment))
    }
}

#[cfg(test)]
mod tests {
    use super::parse_tags;

    #[test]
    fn parse_tags_trims_and_drops_blanks() {
        assert_eq!(
            parse_tags(" design, ui/ux ,, foundation ,"),
            vec!["design", "ui/ux", "foundation"]
        );
        assert!(parse_tags("   ").is_empty());
    }
}
